//! Key estimation from a melody.

use crate::model::note::NoteEvent;

use super::key::{Key, Mode};
use super::pitch::{Letter, Pitch};

pub trait KeyEstimator {
    /// Best-fitting key, or `None` when there is nothing to judge.
    fn estimate(&self, notes: &[NoteEvent]) -> Option<Key>;
}

// Krumhansl-Kessler key profiles
const MAJOR_PROFILE: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];
const MINOR_PROFILE: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Tonic spellings per chromatic position, favouring the conventional key signature.
const MAJOR_TONICS: [(Letter, i8); 12] = [
    (Letter::C, 0),
    (Letter::D, -1),
    (Letter::D, 0),
    (Letter::E, -1),
    (Letter::E, 0),
    (Letter::F, 0),
    (Letter::F, 1),
    (Letter::G, 0),
    (Letter::A, -1),
    (Letter::A, 0),
    (Letter::B, -1),
    (Letter::B, 0),
];
const MINOR_TONICS: [(Letter, i8); 12] = [
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

/// Correlates a length-weighted pitch-class histogram with the
/// Krumhansl-Kessler profiles over all 24 keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileEstimator;

impl ProfileEstimator {
    pub fn histogram(notes: &[NoteEvent]) -> [f64; 12] {
        let mut chroma = [0.0; 12];
        for note in notes {
            chroma[note.pitch.semitone() as usize] += note.length.quarters();
        }
        chroma
    }

    /// Pearson correlation between the histogram and `profile` rotated to `shift`.
    fn correlate(chroma: &[f64; 12], profile: &[f64; 12], shift: usize) -> f64 {
        let chroma_mean = chroma.iter().sum::<f64>() / 12.0;
        let profile_mean = profile.iter().sum::<f64>() / 12.0;
        let mut covariance = 0.0;
        let mut chroma_var = 0.0;
        let mut profile_var = 0.0;
        for (i, &profile_value) in profile.iter().enumerate() {
            let c = chroma[(i + shift) % 12] - chroma_mean;
            let p = profile_value - profile_mean;
            covariance += c * p;
            chroma_var += c * c;
            profile_var += p * p;
        }
        let denominator = (chroma_var * profile_var).sqrt();
        if denominator <= f64::EPSILON {
            return 0.0;
        }
        covariance / denominator
    }

    /// All 24 keys with their scores, in C..B order, major before minor.
    pub fn scores(notes: &[NoteEvent]) -> Vec<(Key, f64)> {
        let chroma = Self::histogram(notes);
        let mut out = Vec::with_capacity(24);
        for shift in 0..12 {
            for (mode, profile, tonics) in [
                (Mode::Major, &MAJOR_PROFILE, &MAJOR_TONICS),
                (Mode::Minor, &MINOR_PROFILE, &MINOR_TONICS),
            ] {
                let (letter, accidental) = tonics[shift];
                let key = Key::new(Pitch::new(letter, accidental), mode);
                out.push((key, Self::correlate(&chroma, profile, shift)));
            }
        }
        out
    }
}

impl KeyEstimator for ProfileEstimator {
    fn estimate(&self, notes: &[NoteEvent]) -> Option<Key> {
        if notes.is_empty() {
            return None;
        }
        let mut best: Option<(Key, f64)> = None;
        for (key, score) in Self::scores(notes) {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((key, score)),
            }
        }
        best.map(|(key, _)| key)
    }
}

/// Estimator that always answers with one key.
#[derive(Debug, Clone, Copy)]
pub struct FixedKey(pub Key);

impl KeyEstimator for FixedKey {
    fn estimate(&self, _notes: &[NoteEvent]) -> Option<Key> {
        Some(self.0)
    }
}
