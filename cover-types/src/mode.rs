use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coverage rule applied to every candidate grid cell.
///
/// - **Intersect**: the cell touches the shape
/// - **Envelope**: the cell lies in the grid-aligned bounding envelope, shape boundaries ignored
/// - **InsideOnly**: the cell is fully contained in the shape
/// - **Border**: the cell touches the shape without being fully contained in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HashMode {
    #[default]
    Intersect,
    Envelope,
    InsideOnly,
    Border,
}

impl HashMode {
    /// All modes, in declaration order.
    pub const ALL: [HashMode; 4] = [
        HashMode::Intersect,
        HashMode::Envelope,
        HashMode::InsideOnly,
        HashMode::Border,
    ];

    /// The wire name of the mode (`intersect`, `envelope`, `insideOnly`, `border`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HashMode::Intersect => "intersect",
            HashMode::Envelope => "envelope",
            HashMode::InsideOnly => "insideOnly",
            HashMode::Border => "border",
        }
    }
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`HashMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHashModeError(pub String);

impl fmt::Display for ParseHashModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown hash mode '{}', expected one of intersect, envelope, insideOnly, border",
            self.0
        )
    }
}

impl std::error::Error for ParseHashModeError {}

impl FromStr for HashMode {
    type Err = ParseHashModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseHashModeError(s.to_string()))
    }
}
