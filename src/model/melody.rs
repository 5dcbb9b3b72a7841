use serde::{Deserialize, Serialize};

use crate::model::note::NoteEvent;
use crate::theory::key::Key;

/// A melody document: the notes to harmonize and, optionally, their key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Melody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    #[serde(default)]
    pub notes: Vec<NoteEvent>,
}

impl Melody {
    pub fn new(notes: Vec<NoteEvent>) -> Self {
        Self { key: None, notes }
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }
}
