//! Error types for voxtext.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxtextError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Pipeline errors
    #[error("Pipeline channel closed at {stage}")]
    ChannelClosed { stage: String },

    #[error("Malformed stream event: {message}")]
    EventStream { message: String },

    // Sink errors
    #[error("Sink failure: {message}")]
    Sink { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxtextError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = VoxtextError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = VoxtextError::ConfigInvalidValue {
            key: "min_length".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for min_length: must be positive"
        );
    }

    #[test]
    fn test_channel_closed_display() {
        let error = VoxtextError::ChannelClosed {
            stage: "controller".to_string(),
        };
        assert_eq!(error.to_string(), "Pipeline channel closed at controller");
    }

    #[test]
    fn test_event_stream_display() {
        let error = VoxtextError::EventStream {
            message: "missing type tag".to_string(),
        };
        assert_eq!(error.to_string(), "Malformed stream event: missing type tag");
    }

    #[test]
    fn test_sink_display() {
        let error = VoxtextError::Sink {
            message: "stdout closed".to_string(),
        };
        assert_eq!(error.to_string(), "Sink failure: stdout closed");
    }

    #[test]
    fn test_other_display() {
        let error = VoxtextError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VoxtextError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VoxtextError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VoxtextError>();
        assert_sync::<VoxtextError>();
    }
}
