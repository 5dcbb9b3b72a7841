//! Triad construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::key::{transpose, Interval, Key, ScaleDegree};
use super::pitch::Pitch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl Quality {
    /// The two stacked thirds, bottom first.
    pub fn thirds(self) -> (Interval, Interval) {
        match self {
            Quality::Major => (Interval::MAJOR_THIRD, Interval::MINOR_THIRD),
            Quality::Minor => (Interval::MINOR_THIRD, Interval::MAJOR_THIRD),
            Quality::Diminished => (Interval::MINOR_THIRD, Interval::MINOR_THIRD),
            Quality::Augmented => (Interval::MAJOR_THIRD, Interval::MAJOR_THIRD),
        }
    }

    /// Chord symbol suffix, e.g. `m` for minor.
    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
            Quality::Diminished => "dim",
            Quality::Augmented => "aug",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Major => "major",
            Quality::Minor => "minor",
            Quality::Diminished => "diminished",
            Quality::Augmented => "augmented",
        };
        write!(f, "{}", name)
    }
}

/// Stacks the two thirds of `quality` on `bass`, returning root, third, fifth.
pub fn build_triad(bass: Pitch, quality: Quality) -> [Pitch; 3] {
    let (lower, upper) = quality.thirds();
    let third = transpose(bass, lower);
    let fifth = transpose(third, upper);
    [bass, third, fifth]
}

/// A triad placed in a key: root degree plus quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triad {
    pub root: ScaleDegree,
    pub quality: Quality,
}

impl Triad {
    pub fn new(root: ScaleDegree, quality: Quality) -> Self {
        Self { root, quality }
    }

    pub fn pitches(self, key: &Key) -> [Pitch; 3] {
        build_triad(key.pitch_of(self.root), self.quality)
    }
}
