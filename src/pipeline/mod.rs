//! Text pipeline for streaming speech sanitization.
//!
//! Implements a multi-station pipeline where each station runs in its own
//! thread, connected by bounded crossbeam channels for backpressure. The
//! stations carry a tagged text-event stream: transcripts in one direction,
//! streamed response chunks in the other.

pub mod annotator;
pub mod classifier;
pub mod controller;
pub mod orchestrator;
pub mod response_cleaner;
pub mod sanitizer;
pub mod sink;
pub mod station;
pub mod types;

pub use annotator::{AnnotationMode, Annotator, annotate};
pub use classifier::{
    Classification, Classifier, RejectReason, classify, is_hallucination, is_too_short,
};
pub use controller::StreamController;
pub use orchestrator::{Pipeline, PipelineConfig, PipelineHandle, notification_channel};
pub use response_cleaner::ResponseCleaner;
pub use sanitizer::sanitize;
pub use sink::{CollectorSink, OutputSink, StdoutSink};
pub use station::{ErrorReporter, LogReporter, Station, StationError, StationRunner};
pub use types::{AnnotatedUtterance, PipelineOutput, ResponseChunk, StreamEvent, Utterance};
