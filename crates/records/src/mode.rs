use std::fmt;

use serde::{Deserialize, Serialize};

/// Game modes with their own highscore table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Clear a fixed number of lines as fast as possible.
    Rush,
    /// Level rises with cleared lines; play until top out.
    Ascent,
    /// No goal, no end condition but topping out.
    Infinity,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Rush, GameMode::Ascent, GameMode::Infinity];

    /// Parse mode from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rush" => Some(GameMode::Rush),
            "ascent" => Some(GameMode::Ascent),
            "infinity" => Some(GameMode::Infinity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Rush => "rush",
            GameMode::Ascent => "ascent",
            GameMode::Infinity => "infinity",
        }
    }

    /// Whether records of this mode are ranked by time rather than score.
    pub fn is_timed(&self) -> bool {
        matches!(self, GameMode::Rush)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
