//! Application settings
//!
//! Settings are read from a JSON file shaped like:
//!
//! ```json
//! {
//!   "Processing": { "InputFilePath": "input.txt", "ChunkSize": 1000 },
//!   "TextFilters": {
//!     "ContainsLetterFilter": { "Enabled": true, "Letter": "t" },
//!     "MinimumLengthFilter": { "Enabled": true, "MinimumLength": 3 },
//!     "VowelMiddleFilter": { "Enabled": true },
//!     "PatternFilter": { "Enabled": false, "Pattern": null }
//!   }
//! }
//! ```
//!
//! Every key is optional. Command-line flags are layered on top before the
//! settings are turned into a [`FilterSet`] and a [`ProcessorConfig`].

use crate::error::ConfigError;
use crate::filter::{
    ContainsLetterFilter, FilterSet, MinimumLengthFilter, PatternFilter, VowelMiddleFilter,
    DEFAULT_LETTER, DEFAULT_MINIMUM_LENGTH,
};
use crate::processor::{ProcessorConfig, DEFAULT_CHUNK_SIZE};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory when present
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Input file used when neither settings nor flags name one
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub processing: ProcessingSettings,
    pub text_filters: FilterSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcessingSettings {
    pub input_file_path: PathBuf,
    pub chunk_size: usize,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            input_file_path: PathBuf::from(DEFAULT_INPUT_FILE),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    #[serde(rename = "ContainsLetterFilter")]
    pub contains_letter: ContainsLetterSettings,
    #[serde(rename = "MinimumLengthFilter")]
    pub minimum_length: MinimumLengthSettings,
    #[serde(rename = "VowelMiddleFilter")]
    pub vowel_middle: VowelMiddleSettings,
    #[serde(rename = "PatternFilter")]
    pub pattern: PatternSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainsLetterSettings {
    pub enabled: bool,
    pub letter: String,
}

impl Default for ContainsLetterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            letter: DEFAULT_LETTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MinimumLengthSettings {
    pub enabled: bool,
    pub minimum_length: usize,
}

impl Default for MinimumLengthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_length: DEFAULT_MINIMUM_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VowelMiddleSettings {
    pub enabled: bool,
}

impl Default for VowelMiddleSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PatternSettings {
    pub enabled: bool,
    pub pattern: Option<String>,
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load an explicit settings file, or the default one if it exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_SETTINGS_FILE);
                if default.is_file() {
                    log::debug!("Loading settings from {:?}", default);
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Build the filters in evaluation order
    pub fn build_filters(&self) -> Result<FilterSet, ConfigError> {
        let filters = &self.text_filters;

        let mut set = FilterSet::new()
            .with(ContainsLetterFilter::new(
                filters.contains_letter.enabled,
                &filters.contains_letter.letter,
            )?)
            .with(MinimumLengthFilter::new(
                filters.minimum_length.enabled,
                filters.minimum_length.minimum_length,
            ))
            .with(VowelMiddleFilter::new(filters.vowel_middle.enabled));

        // A pattern filter only exists once a pattern is configured
        if let Some(pattern) = filters.pattern.pattern.as_deref().filter(|p| !p.is_empty()) {
            set = set.with(PatternFilter::new(filters.pattern.enabled, pattern)?);
        }

        Ok(set)
    }

    pub fn processor_config(&self) -> Result<ProcessorConfig, ConfigError> {
        ProcessorConfig::new(self.processing.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn names(set: &FilterSet) -> Vec<String> {
        set.enabled().iter().map(|f| f.name().to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.processing.chunk_size, 1000);
        assert_eq!(settings.processing.input_file_path, PathBuf::from("input.txt"));
        assert_eq!(
            names(&settings.build_filters().unwrap()),
            vec!["ContainsLetterFilter", "MinimumLengthFilter", "VowelMiddleFilter"]
        );
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(
            r#"{
                "Processing": { "ChunkSize": 2 },
                "TextFilters": {
                    "ContainsLetterFilter": { "Letter": "x" },
                    "VowelMiddleFilter": { "Enabled": false }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.processor_config().unwrap().chunk_size(), 2);
        assert_eq!(settings.text_filters.contains_letter.letter, "x");
        assert!(settings.text_filters.contains_letter.enabled);
        assert_eq!(
            names(&settings.build_filters().unwrap()),
            vec!["ContainsLetterFilter", "MinimumLengthFilter"]
        );
    }

    #[test]
    fn test_pattern_filter_configured() {
        let settings = Settings::from_json(
            r#"{ "TextFilters": { "PatternFilter": { "Enabled": true, "Pattern": "^[0-9]+$" } } }"#,
        )
        .unwrap();

        let set = settings.build_filters().unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(names(&set).last().map(String::as_str), Some("PatternFilter"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero = Settings::from_json(r#"{ "Processing": { "ChunkSize": 0 } }"#).unwrap();
        assert!(matches!(zero.processor_config(), Err(ConfigError::InvalidChunkSize)));

        let bad_regex = Settings::from_json(
            r#"{ "TextFilters": { "PatternFilter": { "Enabled": true, "Pattern": "(" } } }"#,
        )
        .unwrap();
        assert!(matches!(
            bad_regex.build_filters(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "Processing": {{ "InputFilePath": "book.txt" }} }}"#).unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.processing.input_file_path, PathBuf::from("book.txt"));
        assert_eq!(settings.processing.chunk_size, 1000);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            Settings::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Settings::from_file(Path::new("/no/such/settings.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
