//! Foreground timer.
//!
//! A current-thread tokio runtime multiplexes three sources: the tick
//! interval for the engine's current lease, commands typed on stdin, and
//! Ctrl-C. The engine itself stays synchronous; this module only decides
//! when to call it.

use std::time::Duration;

use clap::Args;
use pomoclock_core::settings::parse_minutes;
use pomoclock_core::timer::Clock;
use pomoclock_core::{Event, Mode, Settings, SettingsStore, TickLease, TimerEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Interval, MissedTickBehavior};

use super::TimerOptions;
use crate::terminal::{self, Flash, TerminalNotifier};

const HELP: &str = "commands: [s]tart  [p]ause  [t]oggle  [r]eset  [w]ork  [sb] short  [lb] long  \
set <work|short|long> <min>  set <sound|subsecond> <on|off>  status  [q]uit";

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub timer: TimerOptions,
    /// Mode to begin in
    #[arg(long, value_name = "MODE")]
    pub mode: Option<Mode>,
    /// Begin counting down immediately
    #[arg(long)]
    pub start: bool,
}

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Pause,
    Toggle,
    Reset,
    Mode(Mode),
    Set(SettingChange),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    Minutes(Mode, u32),
    Sound(bool),
    Subsecond(bool),
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::Toggle);
    };
    let input = match head.to_ascii_lowercase().as_str() {
        "s" | "start" => Input::Start,
        "p" | "pause" => Input::Pause,
        "t" | "toggle" => Input::Toggle,
        "r" | "reset" => Input::Reset,
        "w" | "work" => Input::Mode(Mode::Work),
        "sb" | "short" => Input::Mode(Mode::ShortBreak),
        "lb" | "long" => Input::Mode(Mode::LongBreak),
        "mode" => {
            let raw = words.next().ok_or("usage: mode <work|short|long>")?;
            Input::Mode(raw.parse().map_err(|e: pomoclock_core::ValidationError| e.to_string())?)
        }
        "set" => {
            let field = words.next().ok_or("usage: set <field> <value>")?;
            let value = words.next().ok_or("usage: set <field> <value>")?;
            Input::Set(parse_setting(field, value)?)
        }
        "status" => Input::Status,
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(input)
}

fn parse_setting(field: &str, value: &str) -> Result<SettingChange, String> {
    let switch = |v: &str| match v.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(format!("expected on/off, got '{v}'")),
    };
    match field.to_ascii_lowercase().as_str() {
        "sound" => switch(value).map(SettingChange::Sound),
        "subsecond" | "ms" => switch(value).map(SettingChange::Subsecond),
        other => {
            let mode: Mode = other.parse().map_err(|_| format!("unknown setting '{other}'"))?;
            let minutes = parse_minutes(other, value).map_err(|e| e.to_string())?;
            Ok(SettingChange::Minutes(mode, minutes))
        }
    }
}

/// Result of feeding one input to the engine.
#[derive(Debug)]
pub enum Outcome {
    Continue(Option<Event>),
    Rejected(String),
    Quit,
}

/// Apply a user input. Settings changes go through the store first and only
/// reach the engine once accepted.
pub fn handle<C: Clock>(
    input: Input,
    engine: &mut TimerEngine<C>,
    store: &mut SettingsStore,
) -> Outcome {
    let event = match input {
        Input::Start => engine.start(),
        Input::Pause => engine.pause(),
        Input::Toggle => engine.toggle(),
        Input::Reset => Some(engine.reset()),
        Input::Mode(mode) => engine.change_mode(mode),
        Input::Set(change) => {
            let mut next = store.get();
            apply_change(&mut next, change);
            match store.save(next) {
                Ok(saved) => Some(engine.apply_settings(saved)),
                Err(e) => return Outcome::Rejected(e.to_string()),
            }
        }
        Input::Status => Some(engine.snapshot()),
        Input::Help => None,
        Input::Quit => return Outcome::Quit,
    };
    Outcome::Continue(event)
}

fn apply_change(settings: &mut Settings, change: SettingChange) {
    match change {
        SettingChange::Minutes(Mode::Work, m) => settings.work_minutes = m,
        SettingChange::Minutes(Mode::ShortBreak, m) => settings.short_break_minutes = m,
        SettingChange::Minutes(Mode::LongBreak, m) => settings.long_break_minutes = m,
        SettingChange::Sound(on) => settings.sound_enabled = on,
        SettingChange::Subsecond(on) => settings.show_subsecond = on,
    }
}

/// Tokio interval bound to one engine lease.
struct Ticker {
    armed: Option<(TickLease, Interval)>,
}

impl Ticker {
    fn new() -> Self {
        Self { armed: None }
    }

    /// Re-arm to match the engine's current lease. A new lease replaces the
    /// old interval; no lease drops it.
    fn sync(&mut self, lease: Option<TickLease>) {
        let current = self.armed.as_ref().map(|(l, _)| *l);
        if current == lease {
            return;
        }
        self.armed = lease.map(|lease| {
            let mut interval = tokio::time::interval(Duration::from_millis(lease.cadence_ms()));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            (lease, interval)
        });
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    async fn next(&mut self) -> Option<TickLease> {
        match self.armed.as_mut() {
            Some((lease, interval)) => {
                interval.tick().await;
                Some(*lease)
            }
            None => None,
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (store, policy) = args.timer.resolve()?;
    let flash = Flash::default();
    let mut engine = TimerEngine::new(store.get())
        .with_policy(policy)
        .with_notifier(TerminalNotifier::stdout(flash.clone()));
    if let Some(mode) = args.mode {
        engine.change_mode(mode);
    }
    if args.start {
        engine.start();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(engine, store, flash));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn drive<C: Clock>(
    mut engine: TimerEngine<C>,
    mut store: SettingsStore,
    flash: Flash,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = Ticker::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{HELP}");
    tracing::info!(policy = ?engine.policy(), "timer ready");
    terminal::render(&engine, &flash)?;

    loop {
        ticker.sync(engine.lease());
        let banner_down = flash.deadline();
        let banner_sleep = tokio::time::sleep_until(
            banner_down
                .map(tokio::time::Instant::from_std)
                .unwrap_or_else(tokio::time::Instant::now),
        );
        tokio::select! {
            Some(lease) = ticker.next(), if ticker.is_armed() => {
                let now = engine.clock().now_ms();
                if let Some(event) = engine.tick_with(lease, now) {
                    tracing::debug!(kind = event.kind(), "tick event");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                let input = match parse_input(&line) {
                    Ok(Input::Help) => {
                        println!();
                        println!("{HELP}");
                        continue;
                    }
                    Ok(input) => input,
                    Err(message) => {
                        println!();
                        eprintln!("{message}");
                        continue;
                    }
                };
                match handle(input, &mut engine, &mut store) {
                    Outcome::Continue(Some(snapshot @ Event::StateSnapshot { .. })) => {
                        println!();
                        println!("{}", serde_json::to_string_pretty(&snapshot)?);
                    }
                    Outcome::Continue(Some(event)) => {
                        tracing::debug!(kind = event.kind(), "command applied");
                    }
                    Outcome::Continue(None) => {}
                    Outcome::Rejected(message) => {
                        println!();
                        eprintln!("rejected: {message}");
                    }
                    Outcome::Quit => break,
                }
            }
            _ = banner_sleep, if banner_down.is_some() => {}
            _ = &mut ctrl_c => {
                tracing::debug!("interrupted");
                break;
            }
        }
        terminal::render(&engine, &flash)?;
    }

    println!();
    Ok(())
}
