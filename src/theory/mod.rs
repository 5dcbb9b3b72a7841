//! Self-contained diatonic music theory: pitches, keys, triads, key estimation.

pub mod estimate;
pub mod key;
pub mod pitch;
pub mod triad;
