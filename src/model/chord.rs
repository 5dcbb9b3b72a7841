use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::note::{bounded_intensity, Length};
use crate::theory::key::ScaleDegree;
use crate::theory::pitch::{Letter, Pitch};
use crate::theory::triad::Quality;

/// Whether a chord carries a melody note or belongs to the closing cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordRole {
    #[default]
    Body,
    Cadence,
}

/// A voiced triad with timing.
///
/// `pitches` lists the sounding notes bass first. `inversion` says which triad
/// member is in the bass (0 root, 1 third, 2 fifth), so the root position is
/// always recoverable from the two together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    pub pitches: [Pitch; 3],
    pub degree: ScaleDegree,
    pub quality: Quality,
    pub length: Length,
    #[serde(
        default,
        deserialize_with = "bounded_intensity",
        skip_serializing_if = "Option::is_none"
    )]
    pub intensity: Option<u8>,
    #[serde(default)]
    pub inversion: u8,
    #[serde(default)]
    pub role: ChordRole,
}

impl ChordEvent {
    /// A root-position chord from root, third and fifth.
    pub fn root_position(
        members: [Pitch; 3],
        degree: ScaleDegree,
        quality: Quality,
        length: Length,
        intensity: Option<u8>,
    ) -> Self {
        Self {
            pitches: members,
            degree,
            quality,
            length,
            intensity,
            inversion: 0,
            role: ChordRole::Body,
        }
    }

    pub fn bass(&self) -> Pitch {
        self.pitches[0]
    }

    /// Root, third and fifth regardless of voicing.
    pub fn members(&self) -> [Pitch; 3] {
        let mut members = self.pitches;
        members.rotate_right(self.inversion as usize % 3);
        members
    }

    pub fn root(&self) -> Pitch {
        self.members()[0]
    }

    /// Position (0 root, 1 third, 2 fifth) of the member spelled with `letter`.
    pub fn member_with_letter(&self, letter: Letter) -> Option<usize> {
        self.members().iter().position(|p| p.letter == letter)
    }

    /// The same chord revoiced with member `inversion` in the bass.
    pub fn inverted(&self, inversion: u8) -> ChordEvent {
        let mut pitches = self.members();
        pitches.rotate_left(inversion as usize % 3);
        ChordEvent {
            pitches,
            inversion: inversion % 3,
            ..self.clone()
        }
    }

    pub fn with_role(mut self, role: ChordRole) -> Self {
        self.role = role;
        self
    }

    /// Chord symbol with slash bass for inversions, e.g. `E/B`.
    pub fn symbol(&self) -> String {
        let mut out = format!("{}{}", self.root(), self.quality.suffix());
        if self.inversion % 3 != 0 {
            out.push_str(&format!("/{}", self.bass()));
        }
        out
    }

    /// Ascending MIDI notes with the bass in `bass_octave`.
    pub fn midi_notes(&self, bass_octave: i8) -> [i32; 3] {
        let mut notes = [0; 3];
        let mut previous = i32::MIN;
        for (slot, pitch) in notes.iter_mut().zip(self.pitches.iter()) {
            let mut midi = pitch.midi(bass_octave);
            while midi <= previous {
                midi += 12;
            }
            *slot = midi;
            previous = midi;
        }
        notes
    }
}

impl fmt::Display for ChordEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let voicing: Vec<String> = self.pitches.iter().map(|p| p.to_string()).collect();
        write!(f, "{:<8} [{}] {}", self.symbol(), voicing.join(" "), self.length)
    }
}

/// Output of one harmonization run: body chords followed by the cadence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Progression {
    pub chords: Vec<ChordEvent>,
}

impl Progression {
    pub fn new(chords: Vec<ChordEvent>) -> Self {
        Self { chords }
    }

    pub fn body(&self) -> impl Iterator<Item = &ChordEvent> {
        self.chords.iter().filter(|c| c.role == ChordRole::Body)
    }

    pub fn cadence(&self) -> impl Iterator<Item = &ChordEvent> {
        self.chords.iter().filter(|c| c.role == ChordRole::Cadence)
    }

    pub fn list(&self) -> String {
        if self.chords.is_empty() {
            return "[no chords]".to_string();
        }
        let mut out = String::new();
        for (i, chord) in self.chords.iter().enumerate() {
            let tag = match chord.role {
                ChordRole::Body => "",
                ChordRole::Cadence => "  (cadence)",
            };
            out.push_str(&format!("{:>3} {:>2}  {}{}\n", i + 1, chord.degree, chord, tag));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::triad::build_triad;

    fn e_major() -> ChordEvent {
        ChordEvent::root_position(
            build_triad(Pitch::natural(Letter::E), Quality::Major),
            ScaleDegree::DOMINANT,
            Quality::Major,
            Length::QUARTER,
            Some(64),
        )
    }

    fn names(pitches: [Pitch; 3]) -> [String; 3] {
        pitches.map(|p| p.to_string())
    }

    #[test]
    fn inversion_rotates_bass_but_keeps_root() {
        let chord = e_major().inverted(2);
        assert_eq!(names(chord.pitches), ["B", "E", "G#"]);
        assert_eq!(chord.root().to_string(), "E");
        assert_eq!(names(chord.members()), ["E", "G#", "B"]);
        assert_eq!(chord.symbol(), "E/B");

        let back = chord.inverted(0);
        assert_eq!(back, e_major());
    }

    #[test]
    fn finds_members_by_letter() {
        let chord = e_major().inverted(1);
        assert_eq!(chord.member_with_letter(Letter::G), Some(1));
        assert_eq!(chord.member_with_letter(Letter::B), Some(2));
        assert_eq!(chord.member_with_letter(Letter::A), None);
    }

    #[test]
    fn midi_voicing_ascends_from_bass() {
        let chord = e_major().inverted(1);
        assert_eq!(chord.midi_notes(3), [56, 59, 64]);
    }

    #[test]
    fn list_marks_cadence_chords() {
        let progression = Progression::new(vec![
            e_major(),
            e_major().with_role(ChordRole::Cadence),
        ]);
        let listing = progression.list();
        assert_eq!(listing.lines().count(), 2);
        assert!(listing.lines().nth(1).unwrap_or_default().ends_with("(cadence)"));
        assert_eq!(progression.body().count(), 1);
        assert_eq!(progression.cadence().count(), 1);
        assert_eq!(Progression::default().list(), "[no chords]");
    }
}
