//! Timer engine implementation.
//!
//! The timer engine is a deadline-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` at the
//! cadence reported by [`TimerEngine::tick_cadence_ms`].
//!
//! ## Countdown
//!
//! `start()` pins an end timestamp (`now + remaining`). Every tick recomputes
//! `remaining = end - now` instead of subtracting a fixed step, so late or
//! irregular ticks never accumulate drift.
//!
//! ## Mode cycle
//!
//! ```text
//! Work -> ShortBreak -> Work -> ShortBreak -> Work -> ShortBreak -> Work -> LongBreak -> Work ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(settings);
//! engine.start();
//! // In a loop, every engine.tick_cadence_ms():
//! engine.tick(clock.now_ms()); // Returns Some(Event) when an interval completes
//! ```

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::mode::Mode;
use crate::display::{format_remaining, tick_cadence_ms};
use crate::events::Event;
use crate::notify::{Cue, Notifier, SilentNotifier};
use crate::settings::{duration_for, Settings};

/// What happens once an interval runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// The next interval starts counting down immediately.
    #[default]
    AutoStart,
    /// The next interval is loaded but waits for an explicit `start()`.
    WaitForStart,
}

/// Observable state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_ms: u64,
    pub is_running: bool,
    pub completed_work_sessions: u32,
}

/// Identifies the tick source that is currently allowed to drive the engine.
///
/// Issued by `start()`. Anything that stops the countdown revokes it, and a
/// later `start()` issues a new generation, so ticks scheduled for an older
/// countdown are recognisable and dropped by [`TimerEngine::tick_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickLease {
    generation: u64,
    cadence_ms: u64,
}

impl TickLease {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cadence_ms(&self) -> u64 {
        self.cadence_ms
    }
}

/// Core timer engine.
///
/// Operates on caller-supplied timestamps -- no internal thread.
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    settings: Settings,
    policy: AdvancePolicy,
    state: TimerState,
    /// Deadline of the running countdown, in clock milliseconds.
    end_ms: Option<u64>,
    generation: u64,
    lease: Option<TickLease>,
    notifier: Box<dyn Notifier>,
}

impl TimerEngine<SystemClock> {
    /// Create an engine on the system monotonic clock.
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, SystemClock::new())
    }
}

impl<C: Clock> TimerEngine<C> {
    /// Create an engine in Work mode with a full interval loaded, not running.
    pub fn with_clock(settings: Settings, clock: C) -> Self {
        Self {
            clock,
            settings,
            policy: AdvancePolicy::default(),
            state: TimerState {
                mode: Mode::Work,
                remaining_ms: duration_for(Mode::Work, &settings),
                is_running: false,
                completed_work_sessions: 0,
            },
            end_ms: None,
            generation: 0,
            lease: None,
            notifier: Box::new(SilentNotifier),
        }
    }

    pub fn with_policy(mut self, policy: AdvancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn policy(&self) -> AdvancePolicy {
        self.policy
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn remaining_ms(&self) -> u64 {
        self.state.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.state.completed_work_sessions
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Full length of the current mode's interval.
    pub fn total_ms(&self) -> u64 {
        duration_for(self.state.mode, &self.settings)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.remaining_ms as f64 / total as f64)
    }

    /// The tick source currently allowed to drive the countdown, if running.
    pub fn lease(&self) -> Option<TickLease> {
        self.lease
    }

    pub fn tick_cadence_ms(&self) -> u64 {
        tick_cadence_ms(&self.settings)
    }

    /// Remaining time rendered for display.
    pub fn display(&self) -> String {
        format_remaining(self.state.remaining_ms, self.settings.show_subsecond)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            total_ms: self.total_ms(),
            display: self.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down from the clock's current time.
    ///
    /// No-op when already running or when nothing is left on the interval.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running || self.state.remaining_ms == 0 {
            return None;
        }
        let now = self.clock.now_ms();
        self.begin_countdown(now);
        tracing::debug!(
            mode = ?self.state.mode,
            remaining_ms = self.state.remaining_ms,
            "countdown started"
        );
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_ms: self.state.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Stop counting down, keeping the time left.
    ///
    /// If the interval ran out before the pause could be recorded, the
    /// interval completes instead and the next one is left waiting, so the
    /// returned event is an `IntervalCompleted`.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        let now = self.clock.now_ms();
        self.observe(now);
        if self.state.remaining_ms == 0 {
            return Some(self.complete_interval(now, false));
        }
        self.cancel_countdown();
        tracing::debug!(remaining_ms = self.state.remaining_ms, "countdown paused");
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_ms: self.state.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and reload the full interval for the current mode.
    ///
    /// Mode and session count are left alone.
    pub fn reset(&mut self) -> Event {
        self.cancel_countdown();
        self.state.remaining_ms = self.total_ms();
        tracing::debug!(mode = ?self.state.mode, "timer reset");
        Event::TimerReset {
            mode: self.state.mode,
            remaining_ms: self.state.remaining_ms,
            at: Utc::now(),
        }
    }

    /// Manually switch mode. Abandons the session cycle.
    pub fn change_mode(&mut self, new_mode: Mode) -> Option<Event> {
        if new_mode == self.state.mode {
            return None;
        }
        self.cancel_countdown();
        let from = self.state.mode;
        self.state.mode = new_mode;
        self.state.remaining_ms = self.total_ms();
        self.state.completed_work_sessions = 0;
        tracing::debug!(?from, to = ?new_mode, "mode changed manually");
        Some(Event::ModeChanged {
            from,
            to: new_mode,
            remaining_ms: self.state.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Adopt a new settings snapshot. Stops the countdown, reloads the
    /// current mode's interval and clears the session count.
    pub fn apply_settings(&mut self, settings: Settings) -> Event {
        self.cancel_countdown();
        self.settings = settings;
        self.state.remaining_ms = self.total_ms();
        self.state.completed_work_sessions = 0;
        tracing::debug!(?settings, "settings applied");
        Event::SettingsApplied {
            settings,
            remaining_ms: self.state.remaining_ms,
            at: Utc::now(),
        }
    }

    /// Call periodically. Returns `Some(Event::IntervalCompleted)` when the
    /// interval runs out.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.observe(now_ms);
        if self.state.remaining_ms > 0 {
            return None;
        }
        let auto_start = self.policy == AdvancePolicy::AutoStart;
        Some(self.complete_interval(now_ms, auto_start))
    }

    /// Like [`tick`](Self::tick), but ignored unless `lease` is still current.
    pub fn tick_with(&mut self, lease: TickLease, now_ms: u64) -> Option<Event> {
        if self.lease != Some(lease) {
            tracing::trace!(generation = lease.generation, "stale tick ignored");
            return None;
        }
        self.tick(now_ms)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_countdown(&mut self, now_ms: u64) {
        self.end_ms = Some(now_ms.saturating_add(self.state.remaining_ms));
        self.state.is_running = true;
        self.generation += 1;
        self.lease = Some(TickLease {
            generation: self.generation,
            cadence_ms: self.tick_cadence_ms(),
        });
    }

    fn cancel_countdown(&mut self) {
        self.lease = None;
        self.end_ms = None;
        self.state.is_running = false;
    }

    /// Recompute remaining time from the deadline. Never increases it, even
    /// when `now_ms` is older than a previous observation.
    fn observe(&mut self, now_ms: u64) {
        if let Some(end) = self.end_ms {
            let left = end.saturating_sub(now_ms);
            self.state.remaining_ms = self.state.remaining_ms.min(left);
        }
    }

    fn complete_interval(&mut self, now_ms: u64, auto_start: bool) -> Event {
        let finished = self.state.mode;
        self.cancel_countdown();
        self.state.remaining_ms = 0;

        let cue = Cue::for_completion(finished, &self.settings);
        if let Err(e) = self.notifier.notify(&cue) {
            tracing::warn!(error = %e, mode = ?finished, "notifier failed; countdown unaffected");
        }

        match finished {
            Mode::Work => {
                self.state.completed_work_sessions =
                    self.state.completed_work_sessions.saturating_add(1);
            }
            Mode::ShortBreak => {}
            Mode::LongBreak => self.state.completed_work_sessions = 0,
        }
        let next = finished.next(self.state.completed_work_sessions);
        self.state.mode = next;
        self.state.remaining_ms = self.total_ms();

        let auto_started = auto_start && self.state.remaining_ms > 0;
        if auto_started {
            self.begin_countdown(now_ms);
        }

        tracing::info!(
            finished = ?finished,
            next = ?next,
            completed_work_sessions = self.state.completed_work_sessions,
            auto_started,
            "interval completed"
        );

        Event::IntervalCompleted {
            finished_mode: finished,
            next_mode: next,
            completed_work_sessions: self.state.completed_work_sessions,
            auto_started,
            at: Utc::now(),
        }
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for TimerEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("end_ms", &self.end_ms)
            .field("lease", &self.lease)
            .finish_non_exhaustive()
    }
}
