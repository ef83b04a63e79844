use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::timer::{Mode, TimerState};

/// Every state change in the engine produces an Event.
/// The presentation layer renders them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// Manual mode switch. Always clears the session count.
    ModeChanged {
        from: Mode,
        to: Mode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: Settings,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran out and the engine moved to the next mode.
    IntervalCompleted {
        finished_mode: Mode,
        next_mode: Mode,
        completed_work_sessions: u32,
        /// Whether the next interval is already counting down.
        auto_started: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        total_ms: u64,
        display: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::ModeChanged { .. } => "mode_changed",
            Event::SettingsApplied { .. } => "settings_applied",
            Event::IntervalCompleted { .. } => "interval_completed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
