use std::time::Duration;

use crate::model::note::{Length, MAX_INTENSITY};

/// Duration of one quarter note at `bpm`.
pub fn quarter_period(bpm: u32) -> Duration {
    Duration::from_secs_f64(60.0 / bpm.max(1) as f64)
}

/// Wall-clock duration of `length` at `bpm`.
pub fn length_duration(length: Length, bpm: u32) -> Duration {
    Duration::from_secs_f64(quarter_period(bpm).as_secs_f64() * length.quarters())
}

/// Gain for an intensity, with `DEFAULT_VELOCITY` at unity. Values above
/// `MAX_INTENSITY` play as `MAX_INTENSITY`.
pub fn velocity_to_gain(velocity: u8) -> f32 {
    velocity.min(MAX_INTENSITY) as f32 / DEFAULT_VELOCITY as f32
}

/// Velocity for chords that carry no intensity (the cadence).
pub const DEFAULT_VELOCITY: u8 = 100;
