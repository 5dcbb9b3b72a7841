//! Runtime configuration from the environment and an optional `.env` file.

use std::env;

use anyhow::{anyhow, Context, Result};

use crate::storage::Format;
use crate::theory::key::Key;
use crate::theory::pitch::{Letter, Pitch};

pub const SECRET_KEY_VAR: &str = "CHORDIFY_SECRET_KEY";
pub const BPM_VAR: &str = "CHORDIFY_BPM";
pub const FORMAT_VAR: &str = "CHORDIFY_FORMAT";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Key used by the cypher when no `--secret` is given.
    pub secret_key: Key,
    /// Tempo for audio preview.
    pub bpm: u32,
    /// Output format for files without a recognised extension.
    pub format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: Key::minor(Pitch::natural(Letter::A)),
            bpm: 90,
            format: Format::Yaml,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => crate::console::info(format!("loaded {}", path.display())),
            Err(err) if err.not_found() => {}
            Err(err) => crate::console::warn(format!("ignoring .env: {}", err)),
        }
        Self::from_vars(env::vars())
    }

    /// Builds a config from explicit variables; unknown names are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Config::default();
        for (name, value) in vars {
            let value = value.as_ref();
            match name.as_ref() {
                SECRET_KEY_VAR => {
                    config.secret_key = value
                        .parse()
                        .with_context(|| format!("{} is not a key: '{}'", SECRET_KEY_VAR, value))?;
                }
                BPM_VAR => {
                    let bpm: u32 = value
                        .trim()
                        .parse()
                        .with_context(|| format!("{} is not a number: '{}'", BPM_VAR, value))?;
                    if bpm == 0 {
                        return Err(anyhow!("{} must be positive", BPM_VAR));
                    }
                    config.bpm = bpm;
                }
                FORMAT_VAR => {
                    config.format = match value.parse() {
                        Ok(Format::Text) => {
                            return Err(anyhow!(
                                "{}: text holds melodies only (use yaml or json)",
                                FORMAT_VAR
                            ))
                        }
                        Ok(format) => format,
                        Err(e) => return Err(anyhow!("{}: {}", FORMAT_VAR, e)),
                    };
                }
                _ => {}
            }
        }
        Ok(config)
    }
}
