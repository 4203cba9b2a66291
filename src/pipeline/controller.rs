//! Stream controller: routes the tagged event stream through the transforms.
//!
//! Utterances go through classification and annotation; response chunks go
//! through the echo-stripping buffer (which sanitizes on the way out);
//! boundary events only produce state notifications. The controller owns all
//! per-conversation state, so serving multiple conversations means one
//! controller per conversation and nothing shared between them.

use crate::notify::{ConversationState, Notification};
use crate::pipeline::annotator::Annotator;
use crate::pipeline::classifier::{Classification, Classifier};
use crate::pipeline::response_cleaner::ResponseCleaner;
use crate::pipeline::station::{Station, StationError};
use crate::pipeline::types::{AnnotatedUtterance, PipelineOutput, StreamEvent, Utterance};

/// Per-conversation event router.
pub struct StreamController {
    classifier: Classifier,
    annotator: Annotator,
    cleaner: ResponseCleaner,
    event_tx: Option<crossbeam_channel::Sender<Notification>>,
    session_has_output: bool,
    verbose: bool,
}

impl StreamController {
    pub fn new(classifier: Classifier, annotator: Annotator) -> Self {
        Self {
            classifier,
            annotator,
            cleaner: ResponseCleaner::new(),
            event_tx: None,
            session_has_output: false,
            verbose: false,
        }
    }

    /// Attaches the notification side channel.
    pub fn with_event_sender(mut self, tx: crossbeam_channel::Sender<Notification>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Enables stderr diagnostics for dropped transcripts.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Routes one event, returning the ordered outputs it produced.
    pub fn handle(&mut self, event: StreamEvent) -> Vec<PipelineOutput> {
        match event {
            StreamEvent::SpeechStarted => {
                self.notify_state(ConversationState::Recording);
                Vec::new()
            }
            StreamEvent::SpeechStopped => {
                self.notify_state(ConversationState::Processing);
                Vec::new()
            }
            StreamEvent::BotSpeechStarted => {
                self.notify_state(ConversationState::Speaking);
                Vec::new()
            }
            StreamEvent::BotSpeechStopped => {
                self.notify_state(ConversationState::Listening);
                Vec::new()
            }
            StreamEvent::Utterance(utterance) => self.handle_utterance(utterance),
            StreamEvent::ResponseChunk(chunk) => {
                let segments = self.cleaner.feed(&chunk.text);
                self.emit_segments(segments)
            }
            StreamEvent::ResponseEnded => self.end_session(),
        }
    }

    fn handle_utterance(&mut self, utterance: Utterance) -> Vec<PipelineOutput> {
        // The UI sees the original text regardless of what classification
        // decides below.
        self.notify(Notification::Transcription {
            text: utterance.text.clone(),
            is_final: true,
        });

        match self.classifier.classify(&utterance.text) {
            Classification::Rejected(reason) => {
                if self.verbose {
                    eprintln!(
                        "voxtext: dropped {} transcript: {:?}",
                        reason.as_str(),
                        utterance.text
                    );
                }
                Vec::new()
            }
            Classification::Accepted => {
                let annotated = AnnotatedUtterance {
                    text: self.annotator.annotate(&utterance.text),
                    speaker_id: utterance.speaker_id,
                    timestamp: utterance.timestamp,
                };
                vec![PipelineOutput::Context(annotated)]
            }
        }
    }

    fn end_session(&mut self) -> Vec<PipelineOutput> {
        let segments = self.cleaner.end_session();
        let outputs = self.emit_segments(segments);
        if self.session_has_output {
            self.notify(Notification::ResponseDone);
        }
        self.session_has_output = false;
        outputs
    }

    fn emit_segments(&mut self, segments: Vec<String>) -> Vec<PipelineOutput> {
        let mut outputs = Vec::with_capacity(segments.len());
        for segment in segments {
            self.notify(Notification::ResponseChunk {
                text: segment.clone(),
            });
            self.session_has_output = true;
            outputs.push(PipelineOutput::Speech(segment));
        }
        outputs
    }

    fn notify_state(&self, state: ConversationState) {
        self.notify(Notification::State { state });
    }

    fn notify(&self, notification: Notification) {
        if let Some(ref tx) = self.event_tx
            && tx.try_send(notification).is_err()
        {
            // Side channel full or closed — dropping is fine here.
        }
    }
}

impl Station for StreamController {
    type Input = StreamEvent;
    type Output = PipelineOutput;

    fn name(&self) -> &'static str {
        "controller"
    }

    fn process(&mut self, event: StreamEvent) -> Result<Vec<PipelineOutput>, StationError> {
        Ok(self.handle(event))
    }

    fn flush(&mut self) -> Result<Vec<PipelineOutput>, StationError> {
        // Input stream gone mid-session: same as an explicit session end, so
        // partial buffers are flushed rather than silently discarded.
        Ok(self.end_session())
    }
}
