//! Spelled pitch classes: a diatonic letter plus an accidental offset.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the seven diatonic letters, ordered from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Semitones above C of the natural (unaltered) letter.
    pub fn natural_semitone(self) -> i32 {
        const NATURALS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
        NATURALS[self.index()]
    }

    /// Letter reached by moving `steps` letters upward, wrapping at B.
    pub fn step(self, steps: i32) -> Letter {
        Letter::ALL[(self.index() as i32 + steps).rem_euclid(7) as usize]
    }

    /// Number of letters from `self` up to `other`, in 0..7.
    pub fn distance_to(self, other: Letter) -> i32 {
        (other.index() as i32 - self.index() as i32).rem_euclid(7)
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A pitch class spelled as letter + accidental.
///
/// Equality and hashing go by chromatic position, so `G#` equals `Ab`.
/// Compare `letter` directly when the spelling matters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    pub letter: Letter,
    /// Positive values are sharps, negative values flats.
    pub accidental: i8,
}

impl Pitch {
    pub const fn new(letter: Letter, accidental: i8) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, 0)
    }

    /// Chromatic position, 0 = C .. 11 = B.
    pub fn semitone(self) -> u8 {
        self.raw_semitone().rem_euclid(12) as u8
    }

    /// Semitones above C without octave wrapping (`Cb` is -1, `B#` is 12).
    pub(crate) fn raw_semitone(self) -> i32 {
        self.letter.natural_semitone() + self.accidental as i32
    }

    /// MIDI note number of this pitch in the given octave (C4 = 60).
    pub fn midi(self, octave: i8) -> i32 {
        (octave as i32 + 1) * 12 + self.raw_semitone()
    }

    /// Conventional spelling of a chromatic position (sharps except Eb and Bb).
    pub fn chromatic(semitone: u8) -> Pitch {
        const SPELLINGS: [(Letter, i8); 12] = [
            (Letter::C, 0),
            (Letter::C, 1),
            (Letter::D, 0),
            (Letter::E, -1),
            (Letter::E, 0),
            (Letter::F, 0),
            (Letter::F, 1),
            (Letter::G, 0),
            (Letter::G, 1),
            (Letter::A, 0),
            (Letter::B, -1),
            (Letter::B, 0),
        ];
        let (letter, accidental) = SPELLINGS[(semitone % 12) as usize];
        Pitch::new(letter, accidental)
    }
}

impl PartialEq for Pitch {
    fn eq(&self, other: &Self) -> bool {
        self.semitone() == other.semitone()
    }
}

impl Eq for Pitch {}

impl Hash for Pitch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semitone().hash(state);
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)?;
        let glyph = if self.accidental > 0 { '#' } else { 'b' };
        for _ in 0..self.accidental.unsigned_abs() {
            write!(f, "{}", glyph)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PitchParseError {
    #[error("empty pitch name")]
    Empty,
    #[error("'{0}' is not a pitch letter (A-G)")]
    InvalidLetter(char),
    #[error("unexpected '{found}' in pitch name '{name}'")]
    UnexpectedChar { name: String, found: char },
}

/// Parses accidentals following a letter; returns the offset and the number of
/// bytes consumed.
pub(crate) fn parse_accidentals(src: &str) -> (i8, usize) {
    let mut offset = 0i8;
    let mut consumed = 0usize;
    for c in src.chars() {
        match c {
            '#' | '♯' => offset = offset.saturating_add(1),
            'b' | '♭' | '-' => offset = offset.saturating_sub(1),
            _ => break,
        }
        consumed += c.len_utf8();
    }
    (offset, consumed)
}

impl FromStr for Pitch {
    type Err = PitchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let first = s.chars().next().ok_or(PitchParseError::Empty)?;
        let letter = Letter::from_char(first).ok_or(PitchParseError::InvalidLetter(first))?;
        let rest = &s[first.len_utf8()..];
        let (accidental, consumed) = parse_accidentals(rest);
        if let Some(found) = rest[consumed..].chars().next() {
            return Err(PitchParseError::UnexpectedChar {
                name: s.to_string(),
                found,
            });
        }
        Ok(Pitch::new(letter, accidental))
    }
}

impl TryFrom<String> for Pitch {
    type Error = PitchParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pitch> for String {
    fn from(value: Pitch) -> Self {
        value.to_string()
    }
}

pub fn midi_note_to_freq(midi_note: i32) -> f32 {
    440.0 * 2f32.powf((midi_note - 69) as f32 / 12.0)
}
