// third-party imports
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

// ---

/// Severity of a log line, encoded as a single rune in the line prefix.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Deserialize,
    Serialize,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Debug,
    Informational,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Decodes the single-rune severity marker.
    pub fn from_rune(rune: char) -> Option<Self> {
        match rune {
            'D' => Some(Self::Debug),
            'I' => Some(Self::Informational),
            'W' => Some(Self::Warning),
            'E' => Some(Self::Error),
            'F' => Some(Self::Fatal),
            _ => None,
        }
    }
}

// ---
