use std::path::PathBuf;

use clap::Args;
use pomoclock_core::settings::parse_minutes;
use pomoclock_core::{AdvancePolicy, Config, CoreError, Settings, SettingsStore};

/// Flags shared by every command that builds a timer.
///
/// Values come from the config file first; flags given here win.
#[derive(Args, Debug, Default, Clone)]
pub struct TimerOptions {
    /// Config file to read (defaults to ~/.config/pomoclock/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Work interval length in minutes
    #[arg(long, value_name = "MIN", value_parser = work_minutes)]
    pub work: Option<u32>,
    /// Short break length in minutes
    #[arg(long, value_name = "MIN", value_parser = short_break_minutes)]
    pub short_break: Option<u32>,
    /// Long break length in minutes
    #[arg(long, value_name = "MIN", value_parser = long_break_minutes)]
    pub long_break: Option<u32>,
    /// Disable the completion tone
    #[arg(long)]
    pub no_sound: bool,
    /// Show hundredths of a second
    #[arg(long)]
    pub subsecond: bool,
    /// Leave the next interval paused when one completes
    #[arg(long, conflicts_with = "auto_start")]
    pub wait_for_start: bool,
    /// Start the next interval as soon as one completes
    #[arg(long)]
    pub auto_start: bool,
}

fn work_minutes(raw: &str) -> Result<u32, String> {
    parse_minutes("--work", raw).map_err(|e| e.to_string())
}

fn short_break_minutes(raw: &str) -> Result<u32, String> {
    parse_minutes("--short-break", raw).map_err(|e| e.to_string())
}

fn long_break_minutes(raw: &str) -> Result<u32, String> {
    parse_minutes("--long-break", raw).map_err(|e| e.to_string())
}

impl TimerOptions {
    pub fn load_config(&self) -> Result<Config, CoreError> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Resolve the startup settings and advance policy.
    pub fn resolve(&self) -> Result<(SettingsStore, AdvancePolicy), CoreError> {
        let config = self.load_config()?;
        let base = config.settings();
        let settings = Settings {
            work_minutes: self.work.unwrap_or(base.work_minutes),
            short_break_minutes: self.short_break.unwrap_or(base.short_break_minutes),
            long_break_minutes: self.long_break.unwrap_or(base.long_break_minutes),
            sound_enabled: base.sound_enabled && !self.no_sound,
            show_subsecond: base.show_subsecond || self.subsecond,
        };
        let policy = if self.wait_for_start {
            AdvancePolicy::WaitForStart
        } else if self.auto_start {
            AdvancePolicy::AutoStart
        } else {
            config.advance_policy()
        };
        tracing::debug!(?settings, ?policy, "timer options resolved");
        Ok((SettingsStore::new(settings)?, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_config(body: &str) -> (tempfile::TempDir, TimerOptions) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        let opts = TimerOptions {
            config: Some(path),
            ..TimerOptions::default()
        };
        (dir, opts)
    }

    #[test]
    fn config_values_are_used_when_no_flags() {
        let (_dir, opts) = with_config("[timer]\nwork_minutes = 40\nauto_start_next = false\n");
        let (store, policy) = opts.resolve().unwrap();
        assert_eq!(store.get().work_minutes, 40);
        assert_eq!(policy, AdvancePolicy::WaitForStart);
    }

    #[test]
    fn flags_override_config() {
        let (_dir, mut opts) = with_config("[timer]\nwork_minutes = 40\nauto_start_next = false\n");
        opts.work = Some(10);
        opts.no_sound = true;
        opts.auto_start = true;
        let (store, policy) = opts.resolve().unwrap();
        assert_eq!(store.get().work_minutes, 10);
        assert!(!store.get().sound_enabled);
        assert_eq!(policy, AdvancePolicy::AutoStart);
    }

    #[test]
    fn minutes_parsers_reject_zero() {
        assert_eq!(work_minutes("15"), Ok(15));
        assert!(work_minutes("0").is_err());
        assert!(long_break_minutes("-3").is_err());
    }

    #[test]
    fn minutes_errors_name_the_flag() {
        let err = short_break_minutes("0").unwrap_err();
        assert!(err.contains("--short-break"), "unexpected message: {err}");
        let err = long_break_minutes("ten").unwrap_err();
        assert!(err.contains("--long-break"), "unexpected message: {err}");
        assert!(work_minutes("0").unwrap_err().contains("--work"));
    }
}
