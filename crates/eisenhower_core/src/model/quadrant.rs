//! Eisenhower matrix classifier.
//!
//! # Invariants
//! - `Quadrant::classify` is total over `(is_urgent, is_important)`.
//! - Wire codes `Q1`..`Q4` are stable and map 1:1 to quadrants.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One cell of the 2x2 urgency/importance grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Urgent and important.
    #[serde(rename = "Q1")]
    DoFirst,
    /// Important, not urgent.
    #[serde(rename = "Q2")]
    Schedule,
    /// Urgent, not important.
    #[serde(rename = "Q3")]
    Delegate,
    /// Neither urgent nor important.
    #[serde(rename = "Q4")]
    Eliminate,
}

impl Quadrant {
    /// All quadrants in `Q1..Q4` order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoFirst,
        Quadrant::Schedule,
        Quadrant::Delegate,
        Quadrant::Eliminate,
    ];

    /// Places a task in the matrix from its two flags.
    pub fn classify(is_urgent: bool, is_important: bool) -> Self {
        match (is_urgent, is_important) {
            (true, true) => Self::DoFirst,
            (false, true) => Self::Schedule,
            (true, false) => Self::Delegate,
            (false, false) => Self::Eliminate,
        }
    }

    /// Inverse of [`Quadrant::classify`]: the `(is_urgent, is_important)` pair.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Self::DoFirst => (true, true),
            Self::Schedule => (false, true),
            Self::Delegate => (true, false),
            Self::Eliminate => (false, false),
        }
    }

    /// Short wire code used in URLs and JSON.
    pub fn code(self) -> &'static str {
        match self {
            Self::DoFirst => "Q1",
            Self::Schedule => "Q2",
            Self::Delegate => "Q3",
            Self::Eliminate => "Q4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DoFirst => "Do First",
            Self::Schedule => "Schedule",
            Self::Delegate => "Delegate",
            Self::Eliminate => "Eliminate",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::DoFirst => "immediate action",
            Self::Schedule => "plan for later",
            Self::Delegate => "hand off if possible",
            Self::Eliminate => "deprioritize/drop",
        }
    }

    /// Parses a wire code; only the exact strings `Q1`..`Q4` are accepted.
    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "Q1" => Some(Self::DoFirst),
            "Q2" => Some(Self::Schedule),
            "Q3" => Some(Self::Delegate),
            "Q4" => Some(Self::Eliminate),
            _ => None,
        }
    }
}

impl Display for Quadrant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
