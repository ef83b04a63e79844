//! Replay the interval cycle on a hand-driven clock.
//!
//! Useful for checking a configuration's cycle without waiting for it: the
//! engine is ticked at its normal cadence, but time only moves when we say
//! so. Every event is printed as one JSON line.

use clap::Args;
use pomoclock_core::timer::Clock;
use pomoclock_core::{Cue, Event, ManualClock, NotifyError, TimerEngine};

use super::TimerOptions;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub timer: TimerOptions,
    /// Number of intervals to run to completion
    #[arg(long, default_value_t = 8)]
    pub intervals: u32,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (store, policy) = args.timer.resolve()?;
    let clock = ManualClock::new(0);
    let mut engine = TimerEngine::with_clock(store.get(), clock.clone())
        .with_policy(policy)
        .with_notifier(|cue: &Cue| {
            tracing::debug!(mode = ?cue.finished_mode, sound = cue.tone.is_some(), "cue");
            Ok::<(), NotifyError>(())
        });

    let mut completed = 0;
    while completed < args.intervals {
        if !engine.is_running() {
            emit(engine.start())?;
        }
        let now = clock.advance(engine.tick_cadence_ms());
        if let Some(event) = engine.tick(now) {
            emit(Some(event))?;
            completed += 1;
        }
    }
    tracing::info!(
        completed,
        simulated_ms = clock.now_ms(),
        "simulation finished"
    );
    emit(Some(engine.snapshot()))?;
    Ok(())
}

fn emit(event: Option<Event>) -> Result<(), serde_json::Error> {
    if let Some(event) = event {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
