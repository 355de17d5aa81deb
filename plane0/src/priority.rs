//! Priority tiers governing dispatch order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheduling tier for a request.
///
/// `Critical` is scheduled ahead of `High`, `High` ahead of `Medium`,
/// `Medium` ahead of `Low` whenever requests contend for workers. Within a
/// tier, dispatch is first-submitted-first-served.
///
/// The derived `Ord` puts `Critical` greatest, so
/// `Priority::Critical > Priority::Low` reads the way schedulers think.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Lowest tier: background work.
    Low,
    /// Routine work.
    Medium,
    /// Elevated work.
    High,
    /// Highest tier: must never wait behind an eligible lower tier.
    Critical,
}

impl Priority {
    /// All tiers in descending scheduling order (highest first).
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Stable wire name for the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Lane index for this tier, 0 = highest. Dense and stable, so the
    /// dispatcher can index a fixed lane array.
    pub fn lane(&self) -> usize {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority string.
///
/// Transports reject invalid priorities here, before a [`crate::Request`]
/// can even be constructed — malformed input fails closed at the parse
/// boundary rather than defaulting to some tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid priority: {0:?} (expected critical, high, medium, or low)")]
pub struct InvalidPriority(pub String);

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(InvalidPriority(other.to_owned())),
        }
    }
}
