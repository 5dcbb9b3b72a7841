pub mod melody;
pub mod progression;

use std::path::Path;

/// On-disk document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
    /// Melody text notation; melodies only.
    Text,
}

impl Format {
    /// Format implied by the file extension, if it names one.
    pub fn from_extension(path: &Path) -> Option<Format> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "txt" | "mel" => Some(Format::Text),
            _ => None,
        }
    }

    /// Extension first, then `fallback`.
    pub fn for_path(path: &Path, fallback: Format) -> Format {
        Format::from_extension(path).unwrap_or(fallback)
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "text" | "txt" => Ok(Format::Text),
            other => Err(format!("unknown format '{}' (yaml, json or text)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_picks_format() {
        assert_eq!(Format::from_extension(Path::new("a.JSON")), Some(Format::Json));
        assert_eq!(Format::from_extension(Path::new("a.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_extension(Path::new("a.txt")), Some(Format::Text));
        assert_eq!(Format::for_path(Path::new("melody"), Format::Json), Format::Json);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("JSON".parse::<Format>(), Ok(Format::Json));
        assert!("midi".parse::<Format>().is_err());
    }
}
