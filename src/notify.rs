//! Side-channel notifications for the UI/state collaborator.
//!
//! Delivery is fire-and-forget over a bounded channel: the pipeline never
//! blocks on a slow consumer, and a full channel drops the notification.
//! Ordering is the causal order of emission only.

use serde::{Deserialize, Serialize};

/// Conversation state reported on boundary events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// The user is speaking.
    Recording,
    /// Speech ended; transcription and response generation are underway.
    Processing,
    /// The assistant's reply is being voiced.
    Speaking,
    /// The assistant is idle, waiting for input.
    Listening,
}

impl ConversationState {
    /// Lowercase wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Recording => "recording",
            ConversationState::Processing => "processing",
            ConversationState::Speaking => "speaking",
            ConversationState::Listening => "listening",
        }
    }
}

/// One side-channel notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Conversation state changed.
    State { state: ConversationState },
    /// A transcript arrived (sent before classification, with the original
    /// text, whether or not the transcript is later dropped).
    Transcription {
        text: String,
        #[serde(rename = "final")]
        is_final: bool,
    },
    /// One sanitized response segment was emitted.
    ResponseChunk { text: String },
    /// The response session ended after producing at least one segment.
    ResponseDone,
}

impl Notification {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_json_format() {
        let n = Notification::State {
            state: ConversationState::Recording,
        };
        assert_eq!(
            n.to_json().unwrap(),
            r#"{"type":"state","state":"recording"}"#
        );
    }

    #[test]
    fn test_transcription_json_format() {
        let n = Notification::Transcription {
            text: "hello world".to_string(),
            is_final: true,
        };
        let json = n.to_json().unwrap();
        assert!(json.contains("\"type\":\"transcription\""));
        assert!(json.contains("\"text\":\"hello world\""));
        assert!(json.contains("\"final\":true"));
    }

    #[test]
    fn test_response_chunk_json_format() {
        let n = Notification::ResponseChunk {
            text: "partial answer".to_string(),
        };
        let json = n.to_json().unwrap();
        assert!(json.contains("\"type\":\"response_chunk\""));
        assert!(json.contains("\"text\":\"partial answer\""));
    }

    #[test]
    fn test_response_done_json_format() {
        let n = Notification::ResponseDone;
        assert_eq!(n.to_json().unwrap(), r#"{"type":"response_done"}"#);
    }

    #[test]
    fn test_all_variants_roundtrip() {
        let notifications = vec![
            Notification::State {
                state: ConversationState::Listening,
            },
            Notification::Transcription {
                text: "hi".to_string(),
                is_final: true,
            },
            Notification::ResponseChunk {
                text: "chunk".to_string(),
            },
            Notification::ResponseDone,
        ];

        for n in notifications {
            let json = n.to_json().expect("should serialize");
            let back = Notification::from_json(&json).expect("should deserialize");
            assert_eq!(n, back, "roundtrip failed for {:?}", n);
        }
    }

    #[test]
    fn test_invalid_json_returns_error() {
        assert!(Notification::from_json(r#"{"type":"unknown"}"#).is_err());
        assert!(Notification::from_json("not json").is_err());
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ConversationState::Recording.as_str(), "recording");
        assert_eq!(ConversationState::Processing.as_str(), "processing");
        assert_eq!(ConversationState::Speaking.as_str(), "speaking");
        assert_eq!(ConversationState::Listening.as_str(), "listening");
    }
}
