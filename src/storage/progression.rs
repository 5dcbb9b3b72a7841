use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::Format;
use crate::model::chord::Progression;

pub fn save(progression: &Progression, path: impl AsRef<Path>, fallback: Format) -> Result<()> {
    let path = path.as_ref();
    let data = match Format::for_path(path, fallback) {
        Format::Yaml => serde_yaml::to_string(progression)?,
        Format::Json => serde_json::to_string_pretty(progression)?,
        Format::Text => bail!("progressions cannot be written as melody text"),
    };
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

pub fn open(path: impl AsRef<Path>, fallback: Format) -> Result<Progression> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let progression = match Format::for_path(path, fallback) {
        Format::Yaml => serde_yaml::from_str(&data)
            .with_context(|| format!("parsing YAML progression {}", path.display()))?,
        Format::Json => serde_json::from_str(&data)
            .with_context(|| format!("parsing JSON progression {}", path.display()))?,
        Format::Text => bail!("{} is melody text, not a progression", path.display()),
    };
    Ok(progression)
}
