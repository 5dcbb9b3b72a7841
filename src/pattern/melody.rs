//! Text notation for melodies.
//!
//! ```text
//! B:1:10 F A G# | D:1:10 C B E   # comment
//! ```
//!
//! Each note is `LETTER ACCIDENTAL* OCTAVE? (':' LENGTH (':' INTENSITY)?)?`.
//! LENGTH counts quarters as a decimal (`0.5`) or fraction (`3/4`) and
//! defaults to one quarter. INTENSITY is 0-127.

use thiserror::Error;

use crate::model::note::{Length, NoteEvent, MAX_INTENSITY};
use crate::theory::pitch::{Letter, Pitch};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { position: usize, found: char },
    #[error("expected number at position {position}")]
    ExpectedNumber { position: usize },
    #[error("invalid octave at position {position}")]
    InvalidOctave { position: usize },
    #[error("invalid length at position {position} (positive multiple of 0.25)")]
    InvalidLength { position: usize },
    #[error("invalid intensity at position {position} (0-127)")]
    InvalidIntensity { position: usize },
}

pub fn parse_melody(src: &str) -> Result<Vec<NoteEvent>, ParseError> {
    Parser::new(src).parse_notes()
}

/// Formats notes back into the text notation.
pub fn format_melody(notes: &[NoteEvent]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse_notes(mut self) -> Result<Vec<NoteEvent>, ParseError> {
        let mut notes = Vec::new();
        loop {
            self.skip_ws_and_comments();
            match self.peek() {
                None => break,
                Some('|') => {
                    self.bump();
                }
                Some(c) if Letter::from_char(c).is_some() => {
                    let note = self.parse_note()?;
                    notes.push(note);
                }
                Some(found) => {
                    return Err(ParseError::UnexpectedChar {
                        position: self.pos,
                        found,
                    });
                }
            }
        }
        Ok(notes)
    }

    fn parse_note(&mut self) -> Result<NoteEvent, ParseError> {
        let letter = match self.bump().and_then(Letter::from_char) {
            Some(letter) => letter,
            None => return Err(ParseError::UnexpectedEnd),
        };
        let mut accidental = 0i8;
        loop {
            match self.peek() {
                Some('#') | Some('♯') => {
                    self.bump();
                    accidental = accidental.saturating_add(1);
                }
                Some('b') | Some('♭') | Some('-') => {
                    self.bump();
                    accidental = accidental.saturating_sub(1);
                }
                _ => break,
            }
        }
        let mut note = NoteEvent::new(Pitch::new(letter, accidental), Length::QUARTER);

        let digits_at = self.pos;
        let digits = self.take_digits();
        if !digits.is_empty() {
            let octave: i8 = digits
                .parse()
                .map_err(|_| ParseError::InvalidOctave { position: digits_at })?;
            note.octave = Some(octave);
        }

        if matches!(self.peek(), Some(':')) {
            self.bump();
            note.length = self.parse_length()?;
            if matches!(self.peek(), Some(':')) {
                self.bump();
                note = note.with_intensity(self.parse_intensity()?);
            }
        }

        match self.peek() {
            None | Some('|') | Some('#') => Ok(note),
            Some(c) if c.is_whitespace() => Ok(note),
            Some(found) => Err(ParseError::UnexpectedChar {
                position: self.pos,
                found,
            }),
        }
    }

    fn parse_length(&mut self) -> Result<Length, ParseError> {
        let start = self.pos;
        let number = self.take_number();
        if number.is_empty() {
            return Err(ParseError::ExpectedNumber { position: start });
        }
        let mut quarters: f64 = number
            .parse()
            .map_err(|_| ParseError::InvalidLength { position: start })?;
        if matches!(self.peek(), Some('/')) {
            self.bump();
            let denominator_at = self.pos;
            let digits = self.take_digits();
            if digits.is_empty() {
                return Err(ParseError::ExpectedNumber {
                    position: denominator_at,
                });
            }
            let denominator: f64 = digits
                .parse()
                .map_err(|_| ParseError::InvalidLength { position: start })?;
            if denominator == 0.0 {
                return Err(ParseError::InvalidLength { position: start });
            }
            quarters /= denominator;
        }
        Length::from_quarters(quarters).map_err(|_| ParseError::InvalidLength { position: start })
    }

    fn parse_intensity(&mut self) -> Result<u8, ParseError> {
        let start = self.pos;
        let digits = self.take_digits();
        if digits.is_empty() {
            return Err(ParseError::ExpectedNumber { position: start });
        }
        let value: u32 = digits
            .parse()
            .map_err(|_| ParseError::InvalidIntensity { position: start })?;
        if value > MAX_INTENSITY as u32 {
            return Err(ParseError::InvalidIntensity { position: start });
        }
        Ok(value as u8)
    }

    fn take_digits(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn take_number(&mut self) -> &'a str {
        let start = self.pos;
        self.take_digits();
        if matches!(self.peek(), Some('.')) {
            self.bump();
            self.take_digits();
        }
        &self.src[start..self.pos]
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            if matches!(self.peek(), Some('#')) {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }
}
