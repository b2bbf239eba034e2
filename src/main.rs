//! Tierwise CLI
//!
//! Entry point for the `tierwise` command-line tool.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process;
use tierwise::config::{write_layer, EffectiveSettings, TierPaths, TierStack};
use tierwise::logging::{init_logging, LogConfig, LogFormat};
use tierwise::{derive_override, HubLayout, ResolvedConfiguration, ThemeSettings, Tier};
use tracing::error;

#[derive(Parser)]
#[command(name = "tierwise")]
#[command(about = "Resolve tiered service/account/user settings", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct TierArgs {
    /// Service layer document (default: built-in defaults)
    #[arg(long)]
    service: Option<PathBuf>,

    /// Account layer document
    #[arg(long)]
    account: Option<PathBuf>,

    /// User layer document
    #[arg(long)]
    user: Option<PathBuf>,
}

impl From<TierArgs> for TierPaths {
    fn from(args: TierArgs) -> Self {
        TierPaths {
            service: args.service,
            account: args.account,
            user: args.user,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the tiers and print the effective settings
    Resolve {
        #[command(flatten)]
        tiers: TierArgs,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Also write the effective settings record to this file
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Explain which tier decided a field or list
    Explain {
        /// Field or list name
        name: String,

        #[command(flatten)]
        tiers: TierArgs,
    },

    /// Derive a tier's override document from an edited settings file
    Draft {
        /// Edited settings (JSON with `fields` and `lists`)
        #[arg(long)]
        edited: PathBuf,

        /// Where to write the drafted layer (.toml or .json)
        #[arg(long)]
        out: PathBuf,

        /// Tier to draft for
        #[arg(long, default_value = "user")]
        tier: Tier,

        /// Exit with status 2 if any edit was blocked by a lock
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        tiers: TierArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Error initializing logging: {}", e);
    }

    match cli.command {
        Commands::Resolve { tiers, human, out } => run_resolve(tiers.into(), human, out),
        Commands::Explain { name, tiers } => run_explain(&name, tiers.into()),
        Commands::Draft {
            edited,
            out,
            tier,
            strict,
            tiers,
        } => run_draft(tiers.into(), edited, out, tier, strict),
    }
}

fn build_or_exit(paths: &TierPaths) -> EffectiveSettings {
    match EffectiveSettings::build(paths) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "failed to build effective settings");
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(paths: TierPaths, human: bool, out: Option<PathBuf>) {
    let settings = build_or_exit(&paths);

    if let Some(path) = out {
        if let Err(e) = settings.write_to_file(&path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    if human {
        print_human(&settings);
        return;
    }

    match settings.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn print_human(settings: &EffectiveSettings) {
    println!("Effective settings ({})", settings.resolution_digest);
    println!();
    println!("Sources:");
    for source in &settings.sources {
        match &source.path {
            Some(path) => println!("  {:<8} {}", source.tier, path),
            None => println!("  {:<8} (built-in)", source.tier),
        }
    }

    println!();
    println!("Fields:");
    for (name, value) in &settings.settings.fields {
        let tier = settings.provenance.fields.get(name);
        let lock = settings
            .provenance
            .field_lock(name)
            .map(|t| format!(" [locked by {}]", t))
            .unwrap_or_default();
        match tier {
            Some(tier) => println!("  {} = {} ({}){}", name, value, tier, lock),
            None => println!("  {} = {}{}", name, value, lock),
        }
    }

    for (name, items) in &settings.settings.lists {
        println!();
        println!("List {}:", name);
        for item in items {
            let marker = if item.visible { "+" } else { "-" };
            let lock = settings
                .provenance
                .item_lock(name, &item.id)
                .map(|t| format!(" [locked by {}]", t))
                .unwrap_or_default();
            println!("  {} {}{}", marker, item.id, lock);
        }
    }

    if let Ok(theme) = ThemeSettings::from_resolved(&settings.settings) {
        println!();
        println!(
            "Theme: {} mode, {}, accent {}, scale {}",
            theme.display_mode,
            if theme.dark_mode { "dark" } else { "light" },
            theme.accent_color,
            theme.font_scale
        );
    }
    if let Ok(layout) = HubLayout::from_resolved(&settings.settings) {
        println!("Hub: {}", layout.visible.join(", "));
    }

    if !settings.diagnostics.is_empty() {
        println!();
        println!("Diagnostics:");
        for diagnostic in &settings.diagnostics {
            println!("  {}", diagnostic);
        }
    }
}

fn run_explain(name: &str, paths: TierPaths) {
    let settings = build_or_exit(&paths);
    let provenance = &settings.provenance;

    if let Some(value) = settings.get(name) {
        println!("{} = {}", name, value);
        if let Some(tier) = provenance.fields.get(name) {
            println!("  value from: {}", tier);
        }
        match provenance.field_lock(name) {
            Some(tier) => println!("  locked by:  {}", tier),
            None => println!("  locked by:  (open)"),
        }
    } else if let Some(items) = settings.list(name) {
        println!("{} ({} items)", name, items.len());
        if let Some(tier) = provenance.lists.get(name) {
            println!("  order from: {}", tier);
        }
        match provenance.list_lock(name) {
            Some(tier) => println!("  list locked by: {}", tier),
            None => println!("  list locked by: (open)"),
        }
        for item in items {
            if let Some(tier) = provenance.item_lock(name, &item.id) {
                println!("  item {} locked by {}", item.id, tier);
            }
        }
    } else {
        eprintln!("Unknown field or list: {}", name);
        process::exit(1);
    }

    let related: Vec<_> = settings
        .diagnostics
        .iter()
        .filter(|d| d.subject() == Some(name))
        .collect();
    if !related.is_empty() {
        println!("  diagnostics:");
        for diagnostic in related {
            println!("    {}", diagnostic);
        }
    }
}

fn run_draft(paths: TierPaths, edited_path: PathBuf, out: PathBuf, tier: Tier, strict: bool) {
    let stack = match TierStack::load(&paths) {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    let edited: ResolvedConfiguration = match fs::read_to_string(&edited_path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(edited) => edited,
        Err(e) => {
            eprintln!("Error reading {}: {}", edited_path.display(), e);
            process::exit(1);
        }
    };

    let resolution = stack.resolve();
    let draft = match derive_override(&resolution, &stack.layer(tier), &edited) {
        Ok(draft) => draft,
        Err(e) => {
            eprintln!("Edited settings are invalid: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_layer(&out, &draft.layer) {
        eprintln!("Error writing {}: {}", out.display(), e);
        process::exit(1);
    }
    println!("Wrote {} layer to {}", tier, out.display());

    for skipped in &draft.skipped {
        eprintln!("  skipped: {}", skipped);
    }
    if strict && draft.has_blocked() {
        process::exit(2);
    }
}
