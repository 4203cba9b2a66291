use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

use crate::defaults;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub annotator: AnnotatorConfig,
    pub channels: ChannelConfig,
}

/// Transcript classification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum stripped transcript length; shorter transcripts are noise.
    pub min_length: usize,
    /// Extra hallucination phrases dropped on exact (case-insensitive) match.
    pub extra_filters: Vec<String>,
}

/// Transcript annotation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Initial marker mode: true = voice marker, false = text-only marker.
    pub voice_output: bool,
}

/// Channel capacity configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    pub event_buffer: usize,
    pub output_buffer: usize,
    pub notify_buffer: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_length: defaults::MIN_TRANSCRIPT_LENGTH,
            extra_filters: Vec::new(),
        }
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self { voice_output: true }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            event_buffer: defaults::EVENT_BUFFER,
            output_buffer: defaults::OUTPUT_BUFFER,
            notify_buffer: defaults::NOTIFY_BUFFER,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXTEXT_MIN_LENGTH → classifier.min_length
    /// - VOXTEXT_VOICE_OUTPUT → annotator.voice_output
    /// - VOXTEXT_EXTRA_FILTERS → classifier.extra_filters (comma-separated)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(min_length) = std::env::var("VOXTEXT_MIN_LENGTH")
            && let Ok(value) = min_length.trim().parse::<usize>()
        {
            self.classifier.min_length = value;
        }

        if let Ok(voice_output) = std::env::var("VOXTEXT_VOICE_OUTPUT")
            && let Some(value) = parse_bool(&voice_output)
        {
            self.annotator.voice_output = value;
        }

        if let Ok(filters) = std::env::var("VOXTEXT_EXTRA_FILTERS")
            && !filters.is_empty()
        {
            self.classifier.extra_filters = filters
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voxtext/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("voxtext")
            .join("config.toml")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
