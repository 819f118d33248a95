//! Enumerations and field types for tasks.
//!
//! A task carries a single categorisation field, its priority level. Levels are
//! persisted as the integers 0, 1 and 2 and each level has a fixed label, symbol
//! and description shared by the add form, the list rows and the detail view.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

/// Raised when a stored priority is outside 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid priority level {0}; expected 0 (low), 1 (medium) or 2 (high)")]
pub struct InvalidPriority(pub u8);

impl Priority {
    /// All levels in selector order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Icon shown next to the level in the selector and detail view.
    pub fn symbol(self) -> &'static str {
        match self {
            Priority::Low => "↓",
            Priority::Medium => "−",
            Priority::High => "!",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Priority::Low => "Low priority - can be deferred",
            Priority::Medium => "Medium priority - routine task",
            Priority::High => "High priority - needs attention!",
        }
    }

    /// Indicator for list rows. Medium is the unremarkable default and shows nothing.
    pub fn row_indicator(self) -> Option<&'static str> {
        match self {
            Priority::Low => Some("↓"),
            Priority::Medium => None,
            Priority::High => Some("!"),
        }
    }

    /// Step to the neighbouring level, wrapping around.
    pub fn cycle(self, forward: bool) -> Priority {
        let idx = self as usize;
        let len = Self::ALL.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

impl TryFrom<u8> for Priority {
    type Error = InvalidPriority;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            other => Err(InvalidPriority(other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(u8::from(Priority::default()), 1);
    }

    #[test]
    fn presentation_pairing_is_fixed() {
        assert_eq!(Priority::Low.symbol(), "↓");
        assert_eq!(Priority::Low.description(), "Low priority - can be deferred");
        assert_eq!(Priority::Medium.symbol(), "−");
        assert_eq!(Priority::Medium.description(), "Medium priority - routine task");
        assert_eq!(Priority::High.symbol(), "!");
        assert_eq!(Priority::High.description(), "High priority - needs attention!");
    }

    #[test]
    fn only_low_and_high_have_row_indicators() {
        assert_eq!(Priority::Low.row_indicator(), Some("↓"));
        assert_eq!(Priority::Medium.row_indicator(), None);
        assert_eq!(Priority::High.row_indicator(), Some("!"));
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Priority>("0").unwrap(), Priority::Low);
    }

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(serde_json::from_str::<Priority>("3").is_err());
        assert_eq!(Priority::try_from(7), Err(InvalidPriority(7)));
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(Priority::High.cycle(true), Priority::Low);
        assert_eq!(Priority::Low.cycle(false), Priority::High);
        assert_eq!(Priority::Medium.cycle(true), Priority::High);
    }
}
