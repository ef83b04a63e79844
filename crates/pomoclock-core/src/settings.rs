//! Interval durations and display toggles.
//!
//! [`Settings`] is an immutable snapshot. The [`SettingsStore`] owns the
//! current one and swaps it wholesale on [`SettingsStore::save`]; it never
//! reaches into the timer engine; callers forward the saved snapshot to
//! [`TimerEngine::apply_settings`](crate::TimerEngine::apply_settings).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::Mode;

const MS_PER_MINUTE: u64 = 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sound_enabled: bool,
    /// Render hundredths of a second and tick at a finer cadence.
    pub show_subsecond: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sound_enabled: true,
            show_subsecond: false,
        }
    }
}

impl Settings {
    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    /// Check every duration is positive. Reports the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::NonPositiveDuration {
                    field: field.into(),
                    value: 0,
                });
            }
        }
        Ok(())
    }
}

/// Duration of an interval of `mode` in milliseconds.
///
/// Uses saturating arithmetic so oversized values clamp instead of wrapping.
pub fn duration_for(mode: Mode, settings: &Settings) -> u64 {
    u64::from(settings.minutes_for(mode)).saturating_mul(MS_PER_MINUTE)
}

/// Parse a minutes field as typed by a user.
///
/// Accepts only whole, positive numbers; `"2.5"`, `"-1"`, `"0"` and `"ten"`
/// are all rejected with the offending text preserved in the error.
pub fn parse_minutes(field: &str, raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidValue {
        field: field.into(),
        value: trimmed.into(),
        message: "expected a whole number of minutes".into(),
    })?;
    if value <= 0 {
        return Err(ValidationError::NonPositiveDuration {
            field: field.into(),
            value,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidValue {
        field: field.into(),
        value: trimmed.into(),
        message: "value is too large".into(),
    })
}

/// Owner of the current settings snapshot.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    current: Settings,
}

impl SettingsStore {
    /// Create a store seeded with `initial`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `initial` has a non-positive duration.
    pub fn new(initial: Settings) -> Result<Self, ValidationError> {
        initial.validate()?;
        Ok(Self { current: initial })
    }

    pub fn get(&self) -> Settings {
        self.current
    }

    /// Replace the snapshot after validating it.
    ///
    /// On error the previous snapshot stays in place.
    pub fn save(&mut self, new_settings: Settings) -> Result<Settings, ValidationError> {
        new_settings.validate()?;
        self.current = new_settings;
        tracing::debug!(?new_settings, "settings saved");
        Ok(self.current)
    }

    pub fn duration_for(&self, mode: Mode) -> u64 {
        duration_for(mode, &self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_durations() {
        let s = Settings::default();
        assert_eq!(duration_for(Mode::Work, &s), 1_500_000);
        assert_eq!(duration_for(Mode::ShortBreak, &s), 300_000);
        assert_eq!(duration_for(Mode::LongBreak, &s), 900_000);
    }

    #[test]
    fn save_rejects_zero_work_and_keeps_previous() {
        let mut store = SettingsStore::default();
        let before = store.get();
        let err = store
            .save(Settings {
                work_minutes: 0,
                ..before
            })
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonPositiveDuration {
                field: "work_minutes".into(),
                value: 0
            }
        );
        assert_eq!(store.get(), before);
    }

    #[test]
    fn save_replaces_snapshot() {
        let mut store = SettingsStore::default();
        let next = Settings {
            work_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 30,
            sound_enabled: false,
            show_subsecond: true,
        };
        assert_eq!(store.save(next).unwrap(), next);
        assert_eq!(store.get(), next);
        assert_eq!(store.duration_for(Mode::Work), 3_000_000);
    }

    #[test]
    fn new_rejects_invalid_initial_settings() {
        let bad = Settings {
            long_break_minutes: 0,
            ..Settings::default()
        };
        let err = SettingsStore::new(bad).unwrap_err();
        assert_eq!(err.field(), "long_break_minutes");
    }

    #[test]
    fn parse_minutes_accepts_whole_numbers() {
        assert_eq!(parse_minutes("work_minutes", " 45 ").unwrap(), 45);
    }

    #[test]
    fn parse_minutes_rejects_bad_input() {
        assert!(matches!(
            parse_minutes("work_minutes", "-3"),
            Err(ValidationError::NonPositiveDuration { value: -3, .. })
        ));
        assert!(matches!(
            parse_minutes("work_minutes", "0"),
            Err(ValidationError::NonPositiveDuration { value: 0, .. })
        ));
        assert!(matches!(
            parse_minutes("work_minutes", "2.5"),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_minutes("work_minutes", "ten"),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_minutes("work_minutes", "99999999999"),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    proptest! {
        #[test]
        fn duration_is_minutes_times_sixty_thousand(
            work in 1u32..10_000,
            short in 1u32..10_000,
            long in 1u32..10_000,
        ) {
            let s = Settings {
                work_minutes: work,
                short_break_minutes: short,
                long_break_minutes: long,
                ..Settings::default()
            };
            prop_assert_eq!(duration_for(Mode::Work, &s), work as u64 * 60_000);
            prop_assert_eq!(duration_for(Mode::ShortBreak, &s), short as u64 * 60_000);
            prop_assert_eq!(duration_for(Mode::LongBreak, &s), long as u64 * 60_000);
            prop_assert_eq!(duration_for(Mode::Work, &s), duration_for(Mode::Work, &s));
        }
    }
}
