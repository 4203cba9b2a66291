//! Data types for the text-stream pipeline.

use serde::{Deserialize, Serialize};

/// One finalized unit of recognized user speech.
///
/// Produced by the transcription collaborator. The timestamp is an opaque
/// string supplied upstream and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// The transcribed text.
    pub text: String,
    /// Identifier of the speaker as reported by the recognizer.
    pub speaker_id: String,
    /// Recognition timestamp, forwarded verbatim.
    pub timestamp: String,
}

impl Utterance {
    /// Creates a new utterance.
    pub fn new(
        text: impl Into<String>,
        speaker_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            speaker_id: speaker_id.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// An accepted utterance rewritten with its mode marker.
///
/// Only the text differs from the source [`Utterance`]; speaker and
/// timestamp carry over unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedUtterance {
    /// The marker-prefixed, quoted transcript.
    pub text: String,
    /// Identifier of the speaker, carried over.
    pub speaker_id: String,
    /// Recognition timestamp, carried over.
    pub timestamp: String,
}

/// One chunk of a streamed model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// Raw chunk text as produced by the generator.
    pub text: String,
}

impl ResponseChunk {
    /// Creates a new response chunk.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Tagged input event stream fed to the stream controller.
///
/// Utterances and response chunks arrive interleaved with boundary signals
/// from the external collaborators; the controller dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The user started speaking.
    SpeechStarted,
    /// The user stopped speaking; transcription is underway.
    SpeechStopped,
    /// The assistant's spoken output started playing.
    BotSpeechStarted,
    /// The assistant's spoken output finished playing.
    BotSpeechStopped,
    /// A finalized user transcript.
    Utterance(Utterance),
    /// One chunk of the streamed model response.
    ResponseChunk(ResponseChunk),
    /// Terminal signal for the current response session.
    ResponseEnded,
}

/// Controller output routed to the sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutput {
    /// Annotated transcript bound for the conversation context.
    Context(AnnotatedUtterance),
    /// Sanitized text segment bound for speech synthesis.
    Speech(String),
}
