//! Transcript annotator.
//!
//! Accepted transcripts are prefixed with a marker glyph before they re-enter
//! the conversation context, so the model can tell spoken input apart from
//! typed input and knows whether its reply will be voiced.

use crate::defaults::{TEXT_MARKER, VOICE_MARKER};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Which marker an annotated transcript carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMode {
    /// Spoken responses are enabled.
    Voice,
    /// Responses are text-only.
    Text,
}

/// Wraps `text` in quotes behind the marker for `mode`.
pub fn annotate(text: &str, mode: AnnotationMode) -> String {
    let marker = match mode {
        AnnotationMode::Voice => VOICE_MARKER,
        AnnotationMode::Text => TEXT_MARKER,
    };
    format!("{marker} \"{text}\"")
}

/// Annotator bound to a live mode flag.
///
/// The flag is shared with the control plane and may be toggled at any time;
/// it is read at call time, so a change applies to the next utterance and
/// never retroactively. Each conversation owns its own flag.
#[derive(Debug, Clone)]
pub struct Annotator {
    voice_output: Arc<AtomicBool>,
}

impl Annotator {
    pub fn new(voice_output: Arc<AtomicBool>) -> Self {
        Self { voice_output }
    }

    /// The mode the flag currently selects.
    pub fn mode(&self) -> AnnotationMode {
        if self.voice_output.load(Ordering::SeqCst) {
            AnnotationMode::Voice
        } else {
            AnnotationMode::Text
        }
    }

    /// Annotates with the current mode.
    pub fn annotate(&self, text: &str) -> String {
        annotate(text, self.mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_annotation_exact() {
        assert_eq!(
            annotate("what time is it?", AnnotationMode::Voice),
            "\u{1F3A4} \"what time is it?\""
        );
    }

    #[test]
    fn test_text_annotation_exact() {
        assert_eq!(
            annotate("what time is it?", AnnotationMode::Text),
            "\u{1F4D6} \"what time is it?\""
        );
    }

    #[test]
    fn test_annotation_contains_original() {
        for text in ["hello", "a \"quoted\" bit", "multi word input"] {
            assert!(annotate(text, AnnotationMode::Voice).contains(text));
            assert!(annotate(text, AnnotationMode::Text).contains(text));
        }
    }

    #[test]
    fn test_annotator_reads_flag_at_call_time() {
        let flag = Arc::new(AtomicBool::new(true));
        let annotator = Annotator::new(flag.clone());

        assert_eq!(annotator.mode(), AnnotationMode::Voice);
        assert!(annotator.annotate("hi there").starts_with('\u{1F3A4}'));

        // Flip mid-conversation: only subsequent calls see the change
        flag.store(false, Ordering::SeqCst);
        assert_eq!(annotator.mode(), AnnotationMode::Text);
        assert!(annotator.annotate("hi again").starts_with('\u{1F4D6}'));
    }

    #[test]
    fn test_independent_conversations_have_independent_flags() {
        let a = Annotator::new(Arc::new(AtomicBool::new(true)));
        let b = Annotator::new(Arc::new(AtomicBool::new(false)));
        assert_eq!(a.mode(), AnnotationMode::Voice);
        assert_eq!(b.mode(), AnnotationMode::Text);
    }
}
