//! # Pomoclock Core Library
//!
//! This library provides the core logic for the Pomoclock Pomodoro timer.
//! The CLI binary is a thin presentation layer over the same engine.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A deadline-based state machine that requires the caller
//!   to periodically invoke `tick()` with the current clock reading
//! - **Settings Store**: Owns the per-mode durations and display toggles
//! - **Ports**: [`Clock`] for time and [`Notifier`] for interval cues, both
//!   injectable so tests can drive the engine deterministically
//! - **Config**: TOML-based startup configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SettingsStore`]: Validated settings snapshots
//! - [`Config`]: Application configuration management

pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod notify;
pub mod settings;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, NotifyError, ValidationError};
pub use events::Event;
pub use notify::{Cue, Notifier, SilentNotifier};
pub use settings::{duration_for, Settings, SettingsStore};
pub use timer::{AdvancePolicy, Clock, ManualClock, Mode, SystemClock, TickLease, TimerEngine, TimerState};
