//! Harmonizes melodies into baroque-style triad progressions, and hides a
//! melody inside a progression's chord voicings so it can be read back.
//!
//! The pipeline is `NoteEvent`s plus a `Key` → `Rules` (one chord per note,
//! each depending on the previous chord) → closing cadence → `Progression`.

pub mod audio;
pub mod chordify;
pub mod config;
pub mod console;
pub mod model;
pub mod pattern;
pub mod rules;
pub mod storage;
pub mod theory;
