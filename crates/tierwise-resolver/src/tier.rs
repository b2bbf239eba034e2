//! Ownership tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ownership level of a configuration layer.
///
/// Ordering is precedence: `Service < Account < User`. Values flow upward
/// (a User value beats an Account value) while locks flow the other way (a
/// Service lock binds Account and User).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Platform-wide defaults. Always the base layer.
    Service,
    /// Tenant overrides.
    Account,
    /// Individual preferences.
    User,
}

impl Tier {
    /// All tiers in ascending precedence.
    pub const ALL: [Tier; 3] = [Tier::Service, Tier::Account, Tier::User];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Service => "service",
            Tier::Account => "account",
            Tier::User => "user",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier: {0} (expected service, account or user)")]
pub struct ParseTierError(pub String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "service" => Ok(Tier::Service),
            "account" => Ok(Tier::Account),
            "user" => Ok(Tier::User),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}
