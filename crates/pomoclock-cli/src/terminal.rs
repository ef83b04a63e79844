//! Terminal presentation: the status line and the interval-complete cue.

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use pomoclock_core::timer::{Clock, SESSIONS_PER_CYCLE};
use pomoclock_core::{Cue, Mode, Notifier, NotifyError, TimerEngine};

const BELL: &str = "\x07";
const REVERSE: &str = "\x1b[7m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

#[derive(Debug, Clone, Copy)]
struct Banner {
    mode: Mode,
    until: Instant,
}

/// Completion banner shared by the notifier, which raises it, and the render
/// loop, which keeps drawing it until its flash time runs out.
#[derive(Debug, Clone, Default)]
pub struct Flash(Rc<Cell<Option<Banner>>>);

impl Flash {
    pub fn raise(&self, mode: Mode, flash_ms: u64, now: Instant) {
        let banner = (flash_ms > 0).then(|| Banner {
            mode,
            until: now + Duration::from_millis(flash_ms),
        });
        self.0.set(banner);
    }

    /// Mode whose banner is still showing at `now`. Drops an expired banner.
    pub fn active(&self, now: Instant) -> Option<Mode> {
        match self.0.get() {
            Some(banner) if now < banner.until => Some(banner.mode),
            Some(_) => {
                self.0.set(None);
                None
            }
            None => None,
        }
    }

    /// When the current banner should come down.
    pub fn deadline(&self) -> Option<Instant> {
        self.0.get().map(|banner| banner.until)
    }
}

fn banner_text(finished: Mode) -> String {
    let hint = if finished.is_break() {
        "back to work"
    } else {
        "take a break"
    };
    format!("{REVERSE}  {finished} finished, {hint}  {RESET}")
}

/// Rings the terminal bell and flashes a reverse-video banner.
pub struct TerminalNotifier<W: Write> {
    out: W,
    flash: Flash,
}

impl TerminalNotifier<io::Stdout> {
    pub fn stdout(flash: Flash) -> Self {
        Self::new(io::stdout(), flash)
    }
}

impl<W: Write> TerminalNotifier<W> {
    pub fn new(out: W, flash: Flash) -> Self {
        Self { out, flash }
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn notify(&mut self, cue: &Cue) -> Result<(), NotifyError> {
        self.flash.raise(cue.finished_mode, cue.flash_ms, Instant::now());
        let bell = match &cue.tone {
            // A terminal bell has no pitch or length of its own.
            Some(tone) => {
                tracing::debug!(note = %tone.note, duration_ms = tone.duration_ms, "bell");
                BELL
            }
            None => "",
        };
        let banner = if cue.flash_ms > 0 {
            banner_text(cue.finished_mode)
        } else {
            String::new()
        };
        write!(self.out, "{CLEAR_LINE}{bell}{banner}")
            .and_then(|_| self.out.flush())
            .map_err(|e| NotifyError::Failed(e.to_string()))
    }
}

/// One-line status, e.g. `Work  24:59  running  sessions 1/4`.
pub fn status_line<C: Clock>(engine: &TimerEngine<C>) -> String {
    let state = engine.state();
    let activity = if state.is_running { "running" } else { "paused" };
    format!(
        "{:<11} {}  {:<7}  sessions {}/{}",
        state.mode.label(),
        engine.display(),
        activity,
        state.completed_work_sessions,
        SESSIONS_PER_CYCLE
    )
}

fn draw<W: Write, C: Clock>(
    out: &mut W,
    engine: &TimerEngine<C>,
    flash: &Flash,
    now: Instant,
) -> io::Result<()> {
    write!(out, "{CLEAR_LINE}")?;
    if let Some(mode) = flash.active(now) {
        write!(out, "{} ", banner_text(mode))?;
    }
    write!(out, "{}", status_line(engine))?;
    out.flush()
}

/// Redraw the status line in place, behind the banner while it is up.
pub fn render<C: Clock>(engine: &TimerEngine<C>, flash: &Flash) -> io::Result<()> {
    draw(&mut io::stdout().lock(), engine, flash, Instant::now())
}
