//! Rendering helpers for the remaining-time readout.

use crate::settings::Settings;

/// Tick cadence when only whole seconds are shown.
pub const SECOND_CADENCE_MS: u64 = 1_000;
/// Tick cadence when hundredths are shown.
pub const SUBSECOND_CADENCE_MS: u64 = 10;

/// How often the driver should call `tick` for these settings.
pub fn tick_cadence_ms(settings: &Settings) -> u64 {
    if settings.show_subsecond {
        SUBSECOND_CADENCE_MS
    } else {
        SECOND_CADENCE_MS
    }
}

/// `MM:SS`, or `MM:SS.cc` with hundredths. Partial seconds are truncated.
pub fn format_remaining(remaining_ms: u64, show_subsecond: bool) -> String {
    let total_secs = remaining_ms / 1000;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    if show_subsecond {
        let hundredths = (remaining_ms % 1000) / 10;
        format!("{mins:02}:{secs:02}.{hundredths:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}
