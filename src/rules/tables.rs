//! Fixed harmonic tables, indexed by scale degree (1-7).

use crate::theory::key::{Mode, ScaleDegree};
use crate::theory::triad::{Quality, Triad};

/// Candidate next roots from each root, highest priority first.
///
/// Every list names all seven degrees, so some candidate always contains the
/// next melody degree.
const NEXT_CANDIDATES: [[u8; 7]; 7] = [
    [4, 5, 1, 6, 2, 3, 7], // I
    [5, 7, 2, 6, 4, 1, 3], // ii
    [6, 4, 3, 1, 2, 5, 7], // iii
    [5, 1, 2, 4, 3, 6, 7], // IV
    [1, 6, 4, 5, 3, 2, 7], // V
    [2, 5, 4, 6, 3, 1, 7], // vi
    [1, 3, 7, 2, 4, 6, 5], // vii
];

/// Closing roots after a progression last rested on each root.
const CADENCE: [&[u8]; 7] = [
    &[4, 5, 1], // I
    &[5, 1],    // ii
    &[4, 5, 1], // iii
    &[5, 1],    // IV
    &[1],       // V
    &[2, 5, 1], // vi
    &[1],       // vii
];

const MAJOR_QUALITIES: [Quality; 7] = [
    Quality::Major,
    Quality::Minor,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
    Quality::Minor,
    Quality::Diminished,
];

const MINOR_QUALITIES: [Quality; 7] = [
    Quality::Minor,
    Quality::Diminished,
    Quality::Major,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
    Quality::Diminished,
];

fn index(degree: ScaleDegree) -> usize {
    (degree.get() - 1) as usize
}

/// The three degrees of the triad rooted on `degree`.
pub fn triad_members(degree: ScaleDegree) -> [ScaleDegree; 3] {
    [degree, degree.offset(2), degree.offset(4)]
}

pub fn next_candidates(degree: ScaleDegree) -> impl Iterator<Item = ScaleDegree> {
    NEXT_CANDIDATES[index(degree)]
        .iter()
        .map(|&d| ScaleDegree::wrap(d as i32))
}

pub fn cadence(degree: ScaleDegree) -> impl Iterator<Item = ScaleDegree> {
    CADENCE[index(degree)]
        .iter()
        .map(|&d| ScaleDegree::wrap(d as i32))
}

pub fn quality_of(mode: Mode, degree: ScaleDegree) -> Quality {
    match mode {
        Mode::Major => MAJOR_QUALITIES[index(degree)],
        Mode::Minor => MINOR_QUALITIES[index(degree)],
    }
}

/// The diatonic triad on `degree` with its table quality.
pub fn diatonic_triad(mode: Mode, degree: ScaleDegree) -> Triad {
    Triad::new(degree, quality_of(mode, degree))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tonic_triad_members() {
        assert_eq!(triad_members(ScaleDegree::TONIC).map(ScaleDegree::get), [1, 3, 5]);
        assert_eq!(triad_members(ScaleDegree::LEADING_TONE).map(ScaleDegree::get), [7, 2, 4]);
    }

    #[test]
    fn candidate_lists_are_permutations_of_all_degrees() {
        for degree in ScaleDegree::all() {
            let mut seen: Vec<u8> = next_candidates(degree).map(ScaleDegree::get).collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7], "from {}", degree);
        }
    }

    #[test]
    fn every_cadence_ends_on_the_tonic() {
        for degree in ScaleDegree::all() {
            assert_eq!(cadence(degree).last(), Some(ScaleDegree::TONIC));
            assert!(cadence(degree).all(|d| d != ScaleDegree::LEADING_TONE));
        }
    }

    #[test]
    fn qualities_follow_the_mode() {
        assert_eq!(quality_of(Mode::Major, ScaleDegree::SUPERTONIC), Quality::Minor);
        assert_eq!(quality_of(Mode::Minor, ScaleDegree::DOMINANT), Quality::Major);
        assert_eq!(quality_of(Mode::Minor, ScaleDegree::SUBDOMINANT), Quality::Minor);
        assert_eq!(
            diatonic_triad(Mode::Major, ScaleDegree::LEADING_TONE).quality,
            Quality::Diminished
        );
    }
}
