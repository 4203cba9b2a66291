//! Output sinks for the pipeline's two downstream streams.
//!
//! A sink receives sanitized speech segments (bound for the TTS collaborator)
//! and annotated transcripts (bound for the conversation context). Pairs with
//! the event stream on the input side.

use crate::pipeline::station::{Station, StationError};
use crate::pipeline::types::{AnnotatedUtterance, PipelineOutput};
use std::sync::{Arc, Mutex};

/// Pluggable output handler for pipeline results.
pub trait OutputSink: Send + 'static {
    /// Handle one sanitized speech segment.
    fn speech(&mut self, text: &str) -> crate::error::Result<()>;

    /// Handle one annotated transcript.
    fn context(&mut self, utterance: &AnnotatedUtterance) -> crate::error::Result<()>;

    /// Called on pipeline shutdown. Return accumulated speech if applicable.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Station wrapper for any OutputSink implementation.
pub(crate) struct SinkStation {
    sink: Box<dyn OutputSink>,
    result_tx: Option<crossbeam_channel::Sender<Option<String>>>,
}

impl SinkStation {
    pub(crate) fn new(
        sink: Box<dyn OutputSink>,
        result_tx: crossbeam_channel::Sender<Option<String>>,
    ) -> Self {
        Self {
            sink,
            result_tx: Some(result_tx),
        }
    }
}

impl Station for SinkStation {
    type Input = PipelineOutput;
    type Output = ();

    fn name(&self) -> &'static str {
        self.sink.name()
    }

    fn process(&mut self, output: PipelineOutput) -> Result<Vec<()>, StationError> {
        let result = match &output {
            PipelineOutput::Speech(text) => self.sink.speech(text),
            PipelineOutput::Context(utterance) => self.sink.context(utterance),
        };
        match result {
            Ok(()) => Ok(Vec::new()),
            // A sink failure loses one output, not the pipeline.
            Err(e) => Err(StationError::Recoverable(e.to_string())),
        }
    }

    fn shutdown(&mut self) {
        let result = self.sink.finish();
        if let Some(tx) = self.result_tx.take()
            && tx.send(result).is_err()
        {
            eprintln!("voxtext: sink shutdown — result receiver already dropped");
        }
    }
}

/// Collecting sink for tests and batch use.
///
/// Collected values are shared behind `Arc<Mutex<_>>` handles so callers can
/// inspect them while the pipeline owns the sink itself.
pub struct CollectorSink {
    speech: Arc<Mutex<Vec<String>>>,
    context: Arc<Mutex<Vec<AnnotatedUtterance>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self {
            speech: Arc::new(Mutex::new(Vec::new())),
            context: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the collected speech segments.
    pub fn speech_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.speech.clone()
    }

    /// Shared handle to the collected annotated transcripts.
    pub fn context_handle(&self) -> Arc<Mutex<Vec<AnnotatedUtterance>>> {
        self.context.clone()
    }
}

impl Default for CollectorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for CollectorSink {
    fn speech(&mut self, text: &str) -> crate::error::Result<()> {
        if let Ok(mut segments) = self.speech.lock() {
            segments.push(text.to_string());
        }
        Ok(())
    }

    fn context(&mut self, utterance: &AnnotatedUtterance) -> crate::error::Result<()> {
        if let Ok(mut utterances) = self.context.lock() {
            utterances.push(utterance.clone());
        }
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        let segments = self.speech.lock().ok()?;
        if segments.is_empty() {
            None
        } else {
            // Plain concatenation: segments carry their own boundary spaces.
            Some(segments.concat())
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Pipe-mode sink: speech segments to stdout, annotated transcripts as JSON
/// lines to stderr.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn speech(&mut self, text: &str) -> crate::error::Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn context(&mut self, utterance: &AnnotatedUtterance) -> crate::error::Result<()> {
        match serde_json::to_string(utterance) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => {
                return Err(crate::error::VoxtextError::Sink {
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}
