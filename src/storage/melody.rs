use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::Format;
use crate::model::melody::Melody;
use crate::pattern::melody::{format_melody, parse_melody};

pub fn save(melody: &Melody, path: impl AsRef<Path>, fallback: Format) -> Result<()> {
    let path = path.as_ref();
    let data = match Format::for_path(path, fallback) {
        Format::Yaml => serde_yaml::to_string(melody)?,
        Format::Json => serde_json::to_string_pretty(melody)?,
        Format::Text => {
            let mut text = String::new();
            if let Some(key) = &melody.key {
                text.push_str(&format!("# key: {}\n", key));
            }
            text.push_str(&format_melody(&melody.notes));
            text.push('\n');
            text
        }
    };
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

pub fn open(path: impl AsRef<Path>, fallback: Format) -> Result<Melody> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let melody = match Format::for_path(path, fallback) {
        Format::Yaml => serde_yaml::from_str(&data)
            .with_context(|| format!("parsing YAML melody {}", path.display()))?,
        Format::Json => serde_json::from_str(&data)
            .with_context(|| format!("parsing JSON melody {}", path.display()))?,
        Format::Text => {
            let notes =
                parse_melody(&data).with_context(|| format!("parsing melody {}", path.display()))?;
            let mut melody = Melody::new(notes);
            if let Some(key) = key_comment(&data) {
                melody.key = Some(
                    key.parse()
                        .with_context(|| format!("key comment in {}", path.display()))?,
                );
            }
            melody
        }
    };
    if melody.notes.is_empty() {
        bail!("{} contains no notes", path.display());
    }
    Ok(melody)
}

/// Finds a `# key: <name>` comment line in melody text.
fn key_comment(data: &str) -> Option<&str> {
    data.lines()
        .filter_map(|line| line.trim().strip_prefix('#'))
        .find_map(|comment| comment.trim().strip_prefix("key:"))
        .map(str::trim)
}
