//! Triad progressions after common baroque root-motion practice.

use crate::model::chord::{ChordEvent, ChordRole};
use crate::model::note::NoteEvent;
use crate::theory::key::{transpose, Interval, Key, Mode, ScaleDegree};
use crate::theory::triad::{Quality, Triad};

use super::tables::{cadence, diatonic_triad, next_candidates, triad_members};
use super::{HarmonyError, Rules};

/// Opening roots, tried in order, as intervals above the tonic.
const OPENING_ROOTS: [Interval; 4] = [
    Interval::UNISON,
    Interval::PERFECT_FIFTH,
    Interval::PERFECT_FOURTH,
    Interval::MAJOR_SECOND,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TriadBaroque;

impl TriadBaroque {
    fn chord(key: &Key, triad: Triad, note: &NoteEvent) -> ChordEvent {
        ChordEvent::root_position(
            triad.pitches(key),
            triad.root,
            triad.quality,
            note.length,
            note.intensity,
        )
    }

    /// Root degree chosen for `next` after a chord on `previous`.
    pub fn next_root(mode: Mode, previous: ScaleDegree, next: ScaleDegree) -> ScaleDegree {
        let mut hold = None;
        let mut selected = None;
        for candidate in next_candidates(previous) {
            if mode == Mode::Minor && candidate == ScaleDegree::LEADING_TONE {
                continue;
            }
            if !triad_members(candidate).contains(&next) {
                continue;
            }
            if candidate == previous {
                hold = Some(candidate);
                continue;
            }
            selected = Some(candidate);
            break;
        }

        let unstable = matches!(
            selected,
            Some(ScaleDegree::MEDIANT) | Some(ScaleDegree::LEADING_TONE)
        );
        match (selected, hold) {
            (None, Some(hold)) => hold,
            (Some(_), Some(hold)) if unstable => hold,
            (Some(degree), _) => degree,
            (None, None) => fallback_root(mode, next),
        }
    }
}

/// Root used when no table candidate fits; the note's own triad, avoiding the
/// leading-tone chord in minor.
fn fallback_root(mode: Mode, degree: ScaleDegree) -> ScaleDegree {
    if mode == Mode::Minor && degree == ScaleDegree::LEADING_TONE {
        ScaleDegree::DOMINANT
    } else {
        degree
    }
}

impl Rules for TriadBaroque {
    fn first_chord(&self, key: &Key, note: &NoteEvent) -> Result<ChordEvent, HarmonyError> {
        let degree = key.degree_of(note.pitch);
        let root = OPENING_ROOTS
            .iter()
            .map(|&interval| key.degree_of(transpose(key.tonic(), interval)))
            .find(|&candidate| triad_members(candidate).contains(&degree))
            .unwrap_or(ScaleDegree::TONIC);

        let quality = match (key.mode, root) {
            (Mode::Minor, ScaleDegree::TONIC | ScaleDegree::SUBDOMINANT) => Quality::Minor,
            _ => Quality::Major,
        };
        Ok(Self::chord(key, Triad::new(root, quality), note))
    }

    fn next_chord(
        &self,
        key: &Key,
        previous: &ChordEvent,
        next_note: &NoteEvent,
    ) -> Result<ChordEvent, HarmonyError> {
        let previous_degree = key.degree_of(previous.root());
        let next_degree = key.degree_of(key.normalize(next_note.pitch));
        let root = Self::next_root(key.mode, previous_degree, next_degree);
        Ok(Self::chord(key, diatonic_triad(key.mode, root), next_note))
    }

    fn end_cadence(&self, key: &Key, previous: &ChordEvent) -> Vec<ChordEvent> {
        let length = previous.length.doubled();
        cadence(key.degree_of(previous.root()))
            .map(|root| {
                let triad = diatonic_triad(key.mode, root);
                ChordEvent::root_position(triad.pitches(key), root, triad.quality, length, None)
                    .with_role(ChordRole::Cadence)
            })
            .collect()
    }
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

    fn names(chord: &ChordEvent) -> Vec<String> {
        chord.pitches.iter().map(|p| p.to_string()).collect()
    }

    fn deg(n: u8) -> ScaleDegree {
        ScaleDegree::new(n).expect("degree")
    }

    #[test]
    fn first_chord_prefers_tonic() {
        let chord = TriadBaroque.first_chord(&key("C major"), &note("E")).expect("chord");
        assert_eq!(names(&chord), ["C", "E", "G"]);
        assert_eq!(chord.inversion, 0);
    }

    #[test]
    fn first_chord_falls_through_to_dominant_then_subdominant() {
        let a_minor = key("A minor");
        let chord = TriadBaroque.first_chord(&a_minor, &note("B")).expect("chord");
        assert_eq!(chord.degree, ScaleDegree::DOMINANT);
        assert_eq!(names(&chord), ["E", "G#", "B"]);

        let chord = TriadBaroque.first_chord(&a_minor, &note("F")).expect("chord");
        assert_eq!(chord.degree, ScaleDegree::SUBDOMINANT);
        assert_eq!(chord.quality, Quality::Minor);
        assert_eq!(names(&chord), ["D", "F", "A"]);
    }

    #[test]
    fn first_chord_tonic_is_minor_in_minor_keys() {
        let chord = TriadBaroque.first_chord(&key("E minor"), &note("G")).expect("chord");
        assert_eq!(names(&chord), ["E", "G", "B"]);
    }

    #[test]
    fn first_chord_copies_length_and_intensity() {
        let mut n = note("C").with_intensity(42);
        n.length = Length::from_quarters(1.5).expect("length");
        let chord = TriadBaroque.first_chord(&key("C"), &n).expect("chord");
        assert_eq!(chord.intensity, Some(42));
        assert_eq!(chord.length.quarters(), 1.5);
    }

    #[test]
    fn motion_beats_repetition() {
        // From V, the melody note E fits I (first in the list) before V itself.
        assert_eq!(TriadBaroque::next_root(Mode::Major, deg(5), deg(3)), deg(1));
    }

    #[test]
    fn unstable_choice_falls_back_to_hold() {
        // From V, B is first matched by V (held) then by iii, which is unstable.
        assert_eq!(TriadBaroque::next_root(Mode::Major, deg(5), deg(7)), deg(5));
    }

    #[test]
    fn leading_tone_chord_is_skipped_in_minor() {
        assert_eq!(TriadBaroque::next_root(Mode::Major, deg(2), deg(4)), deg(7));
        assert_eq!(TriadBaroque::next_root(Mode::Minor, deg(2), deg(4)), deg(4));
    }

    #[test]
    fn next_chord_normalizes_accidentals() {
        let a_minor = key("A minor");
        let previous = TriadBaroque.first_chord(&a_minor, &note("A")).expect("chord");
        let sharp = TriadBaroque.next_chord(&a_minor, &previous, &note("G#")).expect("chord");
        let natural = TriadBaroque.next_chord(&a_minor, &previous, &note("G")).expect("chord");
        assert_eq!(sharp, natural);
        assert_eq!(names(&sharp), ["E", "G#", "B"]);
    }

    #[test]
    fn cadence_doubles_length_and_drops_intensity() {
        let c = key("C major");
        let last = TriadBaroque.first_chord(&c, &note("C").with_intensity(90)).expect("chord");
        let tail = TriadBaroque.end_cadence(&c, &last);
        let roots: Vec<u8> = tail.iter().map(|ch| ch.degree.get()).collect();
        assert_eq!(roots, [4, 5, 1]);
        for chord in &tail {
            assert_eq!(chord.length, Length::QUARTER.doubled());
            assert_eq!(chord.intensity, None);
            assert_eq!(chord.role, ChordRole::Cadence);
        }
        assert_eq!(names(&tail[0]), ["F", "A", "C"]);
    }

    #[test]
    fn never_holds_when_earlier_motion_exists() {
        for mode in [Mode::Major, Mode::Minor] {
            for previous in ScaleDegree::all() {
                for next in ScaleDegree::all() {
                    let chosen = TriadBaroque::next_root(mode, previous, next);
                    assert!(triad_members(chosen).contains(&next));
                    let earlier_motion = next_candidates(previous)
                        .take_while(|&c| c != previous)
                        .filter(|&c| !(mode == Mode::Minor && c == ScaleDegree::LEADING_TONE))
                        .any(|c| triad_members(c).contains(&next));
                    if earlier_motion {
                        assert_ne!(chosen, previous, "{:?} {} -> {}", mode, previous, next);
                    }
                    if mode == Mode::Minor {
                        assert_ne!(chosen, ScaleDegree::LEADING_TONE);
                    }
                }
            }
        }
    }
}
