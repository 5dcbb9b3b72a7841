//! Harmonic rule sets that turn melody notes into chords.
//!
//! A `Rules` implementation is stateless: each call receives the previous chord
//! explicitly, so one progression is a left-to-right fold over the melody and
//! independent progressions share nothing.

pub mod baroque;
pub mod cypher;
pub mod tables;

use thiserror::Error;

use crate::model::chord::ChordEvent;
use crate::model::note::NoteEvent;
use crate::theory::key::Key;

pub use baroque::TriadBaroque;
pub use cypher::{decode, TriadBaroqueCypher};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HarmonyError {
    #[error("no notes to harmonize")]
    EmptyInput,
    #[error("note {note} cannot be placed in {key}")]
    InvalidNote { note: String, key: String },
    #[error("chord {index} has inversion {inversion} (expected 0-2)")]
    InvalidInversion { index: usize, inversion: u8 },
}

pub trait Rules {
    /// Opening chord for the first melody note.
    fn first_chord(&self, key: &Key, note: &NoteEvent) -> Result<ChordEvent, HarmonyError>;

    /// Chord for `next_note`, following `previous`.
    fn next_chord(
        &self,
        key: &Key,
        previous: &ChordEvent,
        next_note: &NoteEvent,
    ) -> Result<ChordEvent, HarmonyError>;

    /// Closing chords appended after the last body chord.
    fn end_cadence(&self, key: &Key, previous: &ChordEvent) -> Vec<ChordEvent>;
}
