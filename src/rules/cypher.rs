//! Melody hiding through chord voicing.
//!
//! `TriadBaroqueCypher` harmonizes in a fixed secret key, whatever key the
//! caller passes, and voices each body chord so that the member spelled with
//! the melody letter sits in the bass. The inversion index then identifies the
//! melody degree, and `decode` reads the melody back from the chords alone.
//!
//! Decoding with a different key than the one used to encode is not detected;
//! it silently yields a wrong melody (letters follow the chord spelling,
//! accidentals and degrees follow whichever key was given). Keeping the keys
//! matched is the caller's job. The key is ordinary data, not a cryptographic
//! secret.

use crate::model::chord::{ChordEvent, ChordRole};
use crate::model::note::NoteEvent;
use crate::theory::key::Key;

use super::baroque::TriadBaroque;
use super::{HarmonyError, Rules};

#[derive(Debug, Clone, Copy)]
pub struct TriadBaroqueCypher {
    secret: Key,
    inner: TriadBaroque,
}

impl TriadBaroqueCypher {
    pub fn new(secret: Key) -> Self {
        Self {
            secret,
            inner: TriadBaroque,
        }
    }

    /// Revoices `chord` so the member carrying the note's letter is the bass.
    fn encode(&self, chord: ChordEvent, note: &NoteEvent) -> Result<ChordEvent, HarmonyError> {
        let position = chord
            .member_with_letter(note.pitch.letter)
            .ok_or_else(|| HarmonyError::InvalidNote {
                note: note.pitch.to_string(),
                key: self.secret.to_string(),
            })?;
        Ok(chord.inverted(position as u8))
    }

    /// Recovers the melody from chords produced by this cypher.
    pub fn reverse(&self, chords: &[ChordEvent]) -> Result<Vec<NoteEvent>, HarmonyError> {
        decode(chords, &self.secret)
    }
}

impl Rules for TriadBaroqueCypher {
    fn first_chord(&self, _key: &Key, note: &NoteEvent) -> Result<ChordEvent, HarmonyError> {
        let chord = self.inner.first_chord(&self.secret, note)?;
        self.encode(chord, note)
    }

    fn next_chord(
        &self,
        _key: &Key,
        previous: &ChordEvent,
        next_note: &NoteEvent,
    ) -> Result<ChordEvent, HarmonyError> {
        let chord = self.inner.next_chord(&self.secret, previous, next_note)?;
        self.encode(chord, next_note)
    }

    fn end_cadence(&self, _key: &Key, previous: &ChordEvent) -> Vec<ChordEvent> {
        self.inner.end_cadence(&self.secret, previous)
    }
}

/// Reads the melody hidden in `chords` under `secret`. Cadence chords are skipped.
pub fn decode(chords: &[ChordEvent], secret: &Key) -> Result<Vec<NoteEvent>, HarmonyError> {
    chords
        .iter()
        .enumerate()
        .filter(|(_, chord)| chord.role == ChordRole::Body)
        .map(|(index, chord)| {
            if chord.inversion > 2 {
                return Err(HarmonyError::InvalidInversion {
                    index,
                    inversion: chord.inversion,
                });
            }
            let root = secret.degree_of(chord.root());
            let member = root.offset(2 * chord.inversion as i32);
            Ok(NoteEvent {
                pitch: secret.pitch_of(member),
                octave: None,
                length: chord.length,
                intensity: chord.intensity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::Length;
    use crate::theory::pitch::Pitch;

    fn key(name: &str) -> Key {
        name.parse().expect("key")
    }

    fn note(name: &str) -> NoteEvent {
        NoteEvent::new(name.parse::<Pitch>().expect("pitch"), Length::QUARTER)
    }

    #[test]
    fn bass_carries_the_melody_letter() {
        let cypher = TriadBaroqueCypher::new(key("A minor"));
        let chord = cypher.first_chord(&key("C major"), &note("B")).expect("chord");
        assert_eq!(chord.bass().to_string(), "B");
        assert_eq!(chord.inversion, 2);
        assert_eq!(chord.root().to_string(), "E");
    }

    #[test]
    fn caller_key_is_ignored() {
        let cypher = TriadBaroqueCypher::new(key("A minor"));
        let a = cypher.first_chord(&key("C major"), &note("F")).expect("chord");
        let b = cypher.first_chord(&key("F# minor"), &note("F")).expect("chord");
        assert_eq!(a, b);
        let tail_a = cypher.end_cadence(&key("C major"), &a);
        let tail_b = cypher.end_cadence(&key("Eb major"), &b);
        assert_eq!(tail_a, tail_b);
    }

    #[test]
    fn decode_skips_cadence_and_normalizes_to_key() {
        let secret = key("A minor");
        let cypher = TriadBaroqueCypher::new(secret);
        let first = cypher.first_chord(&secret, &note("G").with_intensity(7)).expect("chord");
        let mut chords = vec![first.clone()];
        chords.extend(cypher.end_cadence(&secret, &first));

        let notes = cypher.reverse(&chords).expect("decode");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].pitch.to_string(), "G#");
        assert_eq!(notes[0].intensity, Some(7));
    }

    #[test]
    fn decode_rejects_out_of_range_inversions() {
        let secret = key("C major");
        let mut chord = TriadBaroque.first_chord(&secret, &note("C")).expect("chord");
        chord.inversion = 5;
        assert_eq!(
            decode(&[chord], &secret),
            Err(HarmonyError::InvalidInversion { index: 0, inversion: 5 })
        );
    }

    #[test]
    fn mismatched_key_decodes_silently_to_other_pitches() {
        let cypher = TriadBaroqueCypher::new(key("A minor"));
        let chord = cypher.first_chord(&key("A minor"), &note("G#")).expect("chord");
        let wrong = decode(&[chord], &key("C major")).expect("decode");
        assert_eq!(wrong.len(), 1);
        assert_eq!(wrong[0].pitch.to_string(), "G");
    }
}
