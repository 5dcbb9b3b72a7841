//! Sine-voice rendering of chords for preview playback.

use std::f32::consts::PI;
use std::time::Duration;

use rodio::Source;

use super::timing::{length_duration, velocity_to_gain, DEFAULT_VELOCITY};
use crate::model::chord::ChordEvent;
use crate::theory::pitch::midi_note_to_freq;

pub const SAMPLE_RATE: u32 = 44_100;

/// Octave of the sounding bass.
pub const BASS_OCTAVE: i8 = 3;

/// Seconds of linear fade at each end, to avoid clicks between chords.
const FADE_SECONDS: f32 = 0.01;

/// A chord rendered as summed sine voices, mono.
pub struct ChordTone {
    freqs: Vec<f32>,
    gain: f32,
    total_samples: usize,
    position: usize,
}

impl ChordTone {
    pub fn new(chord: &ChordEvent, bpm: u32) -> Self {
        let freqs: Vec<f32> = chord
            .midi_notes(BASS_OCTAVE)
            .iter()
            .map(|&n| midi_note_to_freq(n))
            .collect();
        let velocity = chord.intensity.unwrap_or(DEFAULT_VELOCITY);
        // Leave headroom for three voices.
        let gain = velocity_to_gain(velocity) * 0.25;
        let seconds = length_duration(chord.length, bpm).as_secs_f64();
        let total_samples = (seconds * SAMPLE_RATE as f64).round() as usize;
        Self {
            freqs,
            gain,
            total_samples,
            position: 0,
        }
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.freqs
    }

    fn envelope(&self) -> f32 {
        let fade = (FADE_SECONDS * SAMPLE_RATE as f32).max(1.0);
        let from_start = self.position as f32 / fade;
        let from_end = (self.total_samples - self.position) as f32 / fade;
        from_start.min(from_end).min(1.0)
    }
}

impl Iterator for ChordTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.total_samples {
            return None;
        }
        let t = self.position as f32 / SAMPLE_RATE as f32;
        let sum: f32 = self.freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum();
        let sample = sum * self.gain * self.envelope();
        self.position += 1;
        Some(sample)
    }
}

impl Source for ChordTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.position)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.total_samples as f64 / SAMPLE_RATE as f64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::Length;
    use crate::theory::key::ScaleDegree;
    use crate::theory::pitch::{Letter, Pitch};
    use crate::theory::triad::{build_triad, Quality};

    fn a_minor(length: Length, intensity: Option<u8>) -> ChordEvent {
        ChordEvent::root_position(
            build_triad(Pitch::natural(Letter::A), Quality::Minor),
            ScaleDegree::TONIC,
            Quality::Minor,
            length,
            intensity,
        )
    }

    #[test]
    fn renders_length_at_tempo() {
        let tone = ChordTone::new(&a_minor(Length::QUARTER, Some(100)), 120);
        assert_eq!(tone.channels(), 1);
        assert_eq!(tone.sample_rate(), SAMPLE_RATE);
        assert_eq!(tone.total_duration(), Some(Duration::from_secs_f64(0.5)));
        assert_eq!(tone.count(), (SAMPLE_RATE / 2) as usize);
    }

    #[test]
    fn voices_follow_the_chord() {
        let tone = ChordTone::new(&a_minor(Length::QUARTER, None), 90);
        let freqs = tone.frequencies();
        assert_eq!(freqs.len(), 3);
        assert!((freqs[0] - 220.0).abs() < 0.01);
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn samples_stay_in_range_and_silence_is_silent() {
        let loud = ChordTone::new(&a_minor(Length::QUARTER, Some(127)), 240);
        assert!(loud.map(f32::abs).fold(0.0, f32::max) <= 1.0);
        let mut silent = ChordTone::new(&a_minor(Length::QUARTER, Some(0)), 240);
        assert!(silent.all(|s| s == 0.0));
    }
}
