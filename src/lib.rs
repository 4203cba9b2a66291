//! voxtext - Streaming speech-text sanitization for voice assistants
//!
//! Sits between a speech-to-text source and a text-to-speech sink: filters
//! recognizer noise and hallucinations, strips response echoes and markdown
//! from streamed model output before it is spoken, and annotates accepted
//! transcripts for the conversation context.

// Enforce error handling discipline in library code
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod notify;
pub mod pipeline;

// Core transforms (classify → annotate, buffer → sanitize)
pub use pipeline::annotator::{AnnotationMode, Annotator, annotate};
pub use pipeline::classifier::{
    Classification, Classifier, RejectReason, classify, is_hallucination, is_too_short,
};
pub use pipeline::response_cleaner::ResponseCleaner;
pub use pipeline::sanitizer::sanitize;

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineHandle, notification_channel};
pub use pipeline::sink::{CollectorSink, OutputSink, StdoutSink};
pub use pipeline::types::{
    AnnotatedUtterance, PipelineOutput, ResponseChunk, StreamEvent, Utterance,
};

// Side channel
pub use notify::{ConversationState, Notification};

// Error handling
pub use error::{Result, VoxtextError};

// Config
pub use config::Config;

// Station framework (for advanced users)
pub use pipeline::station::{ErrorReporter, LogReporter, Station, StationError, StationRunner};

/// Build version string with optional git commit hash.
///
/// Returns `"0.2.0+abc1234"` when git hash is available, `"0.2.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
