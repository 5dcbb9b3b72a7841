//! Runs a rule set over a whole melody.

use crate::model::chord::Progression;
use crate::model::note::NoteEvent;
use crate::rules::{HarmonyError, Rules};
use crate::theory::estimate::{KeyEstimator, ProfileEstimator};
use crate::theory::key::Key;

/// Pairs a melody with the key its chords are fitted in.
pub struct ChordCreator<'a> {
    notes: &'a [NoteEvent],
    key: Key,
}

impl<'a> ChordCreator<'a> {
    /// Uses `key` when given, otherwise estimates one from the notes.
    pub fn new(notes: &'a [NoteEvent], key: Option<Key>) -> Result<Self, HarmonyError> {
        Self::with_estimator(notes, key, &ProfileEstimator)
    }

    pub fn with_estimator(
        notes: &'a [NoteEvent],
        key: Option<Key>,
        estimator: &dyn KeyEstimator,
    ) -> Result<Self, HarmonyError> {
        if notes.is_empty() {
            return Err(HarmonyError::EmptyInput);
        }
        let key = match key {
            Some(key) => key,
            None => {
                let guessed = estimator.estimate(notes).ok_or(HarmonyError::EmptyInput)?;
                crate::console::info(format!("estimated key: {}", guessed));
                guessed
            }
        };
        Ok(Self { notes, key })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// One chord per note, then the closing cadence.
    pub fn chordify(&self, rules: &dyn Rules) -> Result<Progression, HarmonyError> {
        let (first, rest) = self.notes.split_first().ok_or(HarmonyError::EmptyInput)?;
        let mut chords = Vec::with_capacity(self.notes.len() + 3);
        let mut previous = rules.first_chord(&self.key, first)?;
        for note in rest {
            let next = rules.next_chord(&self.key, &previous, note)?;
            chords.push(previous);
            previous = next;
        }
        let cadence = rules.end_cadence(&self.key, &previous);
        chords.push(previous);
        chords.extend(cadence);
        Ok(Progression::new(chords))
    }
}

/// Harmonizes `notes` with `rules`, estimating the key when none is given.
pub fn create_chords(
    notes: &[NoteEvent],
    key: Option<Key>,
    rules: &dyn Rules,
) -> Result<Progression, HarmonyError> {
    ChordCreator::new(notes, key)?.chordify(rules)
}
