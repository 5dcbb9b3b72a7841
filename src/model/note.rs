use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::theory::pitch::Pitch;

/// Number of length units in one quarter note.
pub const UNITS_PER_QUARTER: u32 = 4;

/// A note or chord length, counted in sixteenths (0.25 of a quarter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Length(u32);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LengthError {
    #[error("length must be positive (got {0})")]
    NotPositive(f64),
    #[error("length {0} is not a multiple of 0.25 quarters")]
    OffGrid(f64),
}

impl Length {
    pub const QUARTER: Length = Length(UNITS_PER_QUARTER);

    pub fn from_quarters(quarters: f64) -> Result<Length, LengthError> {
        if !(quarters > 0.0) || !quarters.is_finite() {
            return Err(LengthError::NotPositive(quarters));
        }
        let units = quarters * UNITS_PER_QUARTER as f64;
        if (units - units.round()).abs() > 1e-9 || units.round() > u32::MAX as f64 {
            return Err(LengthError::OffGrid(quarters));
        }
        Ok(Length(units.round() as u32))
    }

    pub fn quarters(self) -> f64 {
        self.0 as f64 / UNITS_PER_QUARTER as f64
    }

    pub fn doubled(self) -> Length {
        Length(self.0.saturating_mul(2))
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::QUARTER
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quarters())
    }
}

impl TryFrom<f64> for Length {
    type Error = LengthError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Length::from_quarters(value)
    }
}

impl From<Length> for f64 {
    fn from(value: Length) -> Self {
        value.quarters()
    }
}

/// Upper bound of the intensity scale (MIDI velocity range).
pub const MAX_INTENSITY: u8 = 127;

/// Reads an optional intensity, rejecting values above `MAX_INTENSITY`.
pub(crate) fn bounded_intensity<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u8>::deserialize(deserializer)? {
        Some(value) if value > MAX_INTENSITY => Err(D::Error::custom(format!(
            "intensity {} is above {}",
            value, MAX_INTENSITY
        ))),
        intensity => Ok(intensity),
    }
}

/// One melody note: pitch, length and optional intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: Pitch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octave: Option<i8>,
    #[serde(default)]
    pub length: Length,
    #[serde(
        default,
        deserialize_with = "bounded_intensity",
        skip_serializing_if = "Option::is_none"
    )]
    pub intensity: Option<u8>,
}

impl NoteEvent {
    pub fn new(pitch: Pitch, length: Length) -> Self {
        Self {
            pitch,
            octave: None,
            length,
            intensity: None,
        }
    }

    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity.min(MAX_INTENSITY));
        self
    }

}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pitch)?;
        if let Some(octave) = self.octave {
            write!(f, "{}", octave)?;
        }
        write!(f, ":{}", self.length)?;
        if let Some(intensity) = self.intensity {
            write!(f, ":{}", intensity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::pitch::Letter;

    #[test]
    fn lengths_snap_to_sixteenths() {
        assert_eq!(Length::from_quarters(1.0), Ok(Length::QUARTER));
        assert_eq!(Length::from_quarters(0.25).map(Length::quarters), Ok(0.25));
        assert_eq!(Length::from_quarters(0.3), Err(LengthError::OffGrid(0.3)));
        assert_eq!(Length::from_quarters(0.0), Err(LengthError::NotPositive(0.0)));
        assert!(Length::from_quarters(f64::NAN).is_err());
        assert_eq!(Length::QUARTER.doubled().quarters(), 2.0);
    }

    #[test]
    fn display_uses_melody_notation() {
        let note = NoteEvent::new(Pitch::new(Letter::G, 1), Length::QUARTER).with_intensity(10);
        assert_eq!(note.to_string(), "G#:1:10");
        let note = NoteEvent {
            octave: Some(4),
            ..NoteEvent::new(Pitch::natural(Letter::C), Length::QUARTER.doubled())
        };
        assert_eq!(note.to_string(), "C4:2");
    }

    #[test]
    fn intensity_is_clamped() {
        let note = NoteEvent::new(Pitch::natural(Letter::A), Length::QUARTER).with_intensity(200);
        assert_eq!(note.intensity, Some(MAX_INTENSITY));
    }

    #[test]
    fn loaded_intensity_is_bounded() {
        let note: NoteEvent =
            serde_json::from_str(r#"{"pitch":"A","length":1.0,"intensity":127}"#).expect("note");
        assert_eq!(note.intensity, Some(127));
        let missing: NoteEvent = serde_json::from_str(r#"{"pitch":"A"}"#).expect("note");
        assert_eq!(missing.intensity, None);
        let err = serde_json::from_str::<NoteEvent>(r#"{"pitch":"A","intensity":200}"#)
            .expect_err("above range");
        assert!(err.to_string().contains("intensity 200 is above 127"), "{}", err);
    }
}
