//! Diatonic key arithmetic.
//!
//! A key is a spelled tonic plus a mode. Major keys use the major scale and
//! minor keys the harmonic minor scale, so the raised leading tone is diatonic.
//! Every letter maps to exactly one scale degree, which makes `degree_of` and
//! `pitch_of` total.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pitch::{parse_accidentals, Letter, Pitch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Semitone offsets of degrees 1-7 above the tonic.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 11],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// Position 1-7 of a pitch within a key's scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ScaleDegree(u8);

impl ScaleDegree {
    pub const TONIC: ScaleDegree = ScaleDegree(1);
    pub const SUPERTONIC: ScaleDegree = ScaleDegree(2);
    pub const MEDIANT: ScaleDegree = ScaleDegree(3);
    pub const SUBDOMINANT: ScaleDegree = ScaleDegree(4);
    pub const DOMINANT: ScaleDegree = ScaleDegree(5);
    pub const SUBMEDIANT: ScaleDegree = ScaleDegree(6);
    pub const LEADING_TONE: ScaleDegree = ScaleDegree(7);

    pub fn new(degree: u8) -> Option<ScaleDegree> {
        (1..=7).contains(&degree).then_some(ScaleDegree(degree))
    }

    /// Folds any integer onto 1-7 (8 is 1, 0 is 7).
    pub fn wrap(degree: i32) -> ScaleDegree {
        ScaleDegree(((degree - 1).rem_euclid(7) + 1) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Degree reached by moving `steps` scale steps upward.
    pub fn offset(self, steps: i32) -> ScaleDegree {
        ScaleDegree::wrap(self.0 as i32 + steps)
    }

    fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = ScaleDegree> {
        (1..=7).map(ScaleDegree)
    }
}

impl fmt::Display for ScaleDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ScaleDegree {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ScaleDegree::new(value).ok_or_else(|| format!("scale degree {} is outside 1-7", value))
    }
}

impl From<ScaleDegree> for u8 {
    fn from(value: ScaleDegree) -> Self {
        value.0
    }
}

/// A spelled interval: letter steps plus chromatic size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub steps: u8,
    pub semitones: u8,
}

impl Interval {
    pub const UNISON: Interval = Interval::new(0, 0);
    pub const MAJOR_SECOND: Interval = Interval::new(1, 2);
    pub const MINOR_THIRD: Interval = Interval::new(2, 3);
    pub const MAJOR_THIRD: Interval = Interval::new(2, 4);
    pub const PERFECT_FOURTH: Interval = Interval::new(3, 5);
    pub const PERFECT_FIFTH: Interval = Interval::new(4, 7);

    pub const fn new(steps: u8, semitones: u8) -> Self {
        Self { steps, semitones }
    }
}

/// Moves `pitch` up by `interval`, keeping the letter arithmetic exact.
pub fn transpose(pitch: Pitch, interval: Interval) -> Pitch {
    let letter = pitch.letter.step(interval.steps as i32);
    let target = pitch.raw_semitone() + interval.semitones as i32;
    let mut accidental = (target - letter.natural_semitone()).rem_euclid(12);
    if accidental > 6 {
        accidental -= 12;
    }
    Pitch::new(letter, accidental as i8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    pub tonic: Pitch,
    pub mode: Mode,
}

impl Key {
    pub const fn new(tonic: Pitch, mode: Mode) -> Self {
        Self { tonic, mode }
    }

    pub fn minor(tonic: Pitch) -> Self {
        Self::new(tonic, Mode::Minor)
    }

    pub fn tonic(&self) -> Pitch {
        self.tonic
    }

    /// Spelled pitch of a scale degree.
    pub fn pitch_of(&self, degree: ScaleDegree) -> Pitch {
        let index = degree.index();
        transpose(
            self.tonic,
            Interval::new(index as u8, self.mode.intervals()[index]),
        )
    }

    /// Scale degree of a pitch, decided by its letter alone.
    pub fn degree_of(&self, pitch: Pitch) -> ScaleDegree {
        ScaleDegree::wrap(self.tonic.letter.distance_to(pitch.letter) + 1)
    }

    /// Replaces the accidental of `pitch` with the one this key gives its letter.
    pub fn normalize(&self, pitch: Pitch) -> Pitch {
        self.pitch_of(self.degree_of(pitch))
    }

    pub fn scale(&self) -> [Pitch; 7] {
        let mut out = [self.tonic; 7];
        for (slot, degree) in out.iter_mut().zip(ScaleDegree::all()) {
            *slot = self.pitch_of(degree);
        }
        out
    }

    /// The fifteen major and fifteen minor keys of conventional notation.
    pub fn standard() -> Vec<Key> {
        const MAJOR: [&str; 15] = [
            "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
        ];
        const MINOR: [&str; 15] = [
            "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#", "G#", "D#", "A#",
        ];
        let major = MAJOR.iter().map(|name| (name, Mode::Major));
        let minor = MINOR.iter().map(|name| (name, Mode::Minor));
        major
            .chain(minor)
            .filter_map(|(name, mode)| name.parse().ok().map(|tonic| Key::new(tonic, mode)))
            .collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key name")]
    Empty,
    #[error("'{0}' is not a key tonic")]
    InvalidTonic(String),
    #[error("unknown mode '{0}' (expected major or minor)")]
    InvalidMode(String),
}

impl FromStr for Key {
    type Err = KeyParseError;

    /// Accepts `A minor`, `C major`, `Am`, `a` (lowercase is minor), `C-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let head = parts.next().ok_or(KeyParseError::Empty)?;
        let mode_word = parts.next();
        if let Some(extra) = parts.next() {
            return Err(KeyParseError::InvalidMode(extra.to_string()));
        }

        let first = head.chars().next().ok_or(KeyParseError::Empty)?;
        let letter =
            Letter::from_char(first).ok_or_else(|| KeyParseError::InvalidTonic(head.to_string()))?;
        let rest = &head[first.len_utf8()..];
        let (accidental, consumed) = parse_accidentals(rest);
        let suffix = &rest[consumed..];
        let tonic = Pitch::new(letter, accidental);

        let mode = match (mode_word, suffix) {
            (Some(word), "") => match word.to_ascii_lowercase().as_str() {
                "major" | "maj" => Mode::Major,
                "minor" | "min" => Mode::Minor,
                other => return Err(KeyParseError::InvalidMode(other.to_string())),
            },
            (None, "m") => Mode::Minor,
            (None, "") if first.is_ascii_lowercase() => Mode::Minor,
            (None, "") => Mode::Major,
            _ => return Err(KeyParseError::InvalidTonic(head.to_string())),
        };
        Ok(Key::new(tonic, mode))
    }
}

impl TryFrom<String> for Key {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(value: Key) -> Self {
        value.to_string()
    }
}
