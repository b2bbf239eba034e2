//! Tiered settings resolution.
//!
//! A setting is computed by cascading three ownership tiers
//! (Service defaults, then Account overrides, then User overrides). Any tier
//! may lock individual fields, whole lists, or single list items so that
//! later tiers cannot change them.
//!
//! Resolution is a pure function of already-loaded layers:
//!
//! ```
//! use tierwise_resolver::{resolve, ConfigurationLayer, Tier};
//!
//! let service = ConfigurationLayer::builder(Tier::Service)
//!     .field("display_mode", "tiles")
//!     .build()?;
//! let account = ConfigurationLayer::builder(Tier::Account)
//!     .field("display_mode", "grid")
//!     .lock_field("display_mode")
//!     .build()?;
//! let user = ConfigurationLayer::builder(Tier::User)
//!     .field("display_mode", "list")
//!     .build()?;
//!
//! let resolved = resolve(&service, &[account, user]);
//! assert_eq!(resolved.get_str("display_mode"), Some("grid"));
//! # Ok::<(), tierwise_resolver::LayerError>(())
//! ```

mod diagnostic;
mod diff;
mod error;
mod fields;
mod item;
mod layer;
mod lists;
mod locks;
mod resolve;
mod resolved;
mod tier;
mod value;

pub use diagnostic::Diagnostic;
pub use diff::{derive_override, OverrideDraft};
pub use error::LayerError;
pub use item::{ItemId, ListItem};
pub use layer::{ConfigurationLayer, LayerBody, LayerBuilder};
pub use locks::LockSet;
pub use resolve::{resolve, resolve_detailed};
pub use resolved::{Provenance, Resolution, ResolvedConfiguration};
pub use tier::{ParseTierError, Tier};
pub use value::{ScalarValue, ValueKind, MAX_EXACT_INTEGER};
