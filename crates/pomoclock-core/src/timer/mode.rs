use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of work intervals in one session cycle. The break after the last
/// one is a long break.
pub const SESSIONS_PER_CYCLE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Work)
    }

    /// Mode that follows `self` once its interval runs out.
    ///
    /// `completed_work_sessions` is the count *after* the finished interval
    /// has been accounted for.
    pub fn next(self, completed_work_sessions: u32) -> Mode {
        match self {
            Mode::Work if completed_work_sessions % SESSIONS_PER_CYCLE == 0 => Mode::LongBreak,
            Mode::Work => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "w" => Ok(Mode::Work),
            "short" | "short_break" | "short-break" | "sb" => Ok(Mode::ShortBreak),
            "long" | "long_break" | "long-break" | "lb" => Ok(Mode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                value: other.into(),
                message: "expected one of: work, short, long".into(),
            }),
        }
    }
}
