//! Echo-stripping buffer for streamed responses.
//!
//! The upstream generator occasionally opens its reply by quoting the user's
//! utterance back, as a blockquote holding a quoted string:
//!
//! ```text
//! > 🎤 "what time is it?"
//!
//! It's 3 PM.
//! ```
//!
//! That preamble must never reach speech synthesis, but it arrives split
//! arbitrarily across stream chunks, so it cannot be detected chunk by
//! chunk. This buffer accumulates chunks until the echo is either fully
//! matched and removed or ruled out, then switches to streaming pass-through
//! for the rest of the session.

use crate::defaults::ECHO_QUOTE_PROBE;
use crate::pipeline::sanitizer::sanitize;

/// Per-session state machine: accumulating until the echo question is
/// settled, then pass-through until the session ends.
#[derive(Debug, Default)]
pub struct ResponseCleaner {
    buffer: String,
    echo_resolved: bool,
}

impl ResponseCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the current session has settled the echo question.
    pub fn is_resolved(&self) -> bool {
        self.echo_resolved
    }

    /// Feeds one response chunk, returning any sanitized segments that are
    /// ready for emission. Empty sanitizer results are never emitted.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        if self.echo_resolved {
            // Pass-through: each chunk is sanitized independently.
            return emit(sanitize(chunk));
        }

        self.buffer.push_str(chunk);

        if let Some(end) = echo_end(&self.buffer) {
            // Complete echo found: drop it, speak only the remainder.
            let remainder = self.buffer.split_off(end);
            self.buffer.clear();
            self.echo_resolved = true;
            return emit(sanitize(&remainder));
        }

        if !may_be_echo(&self.buffer) {
            // Not an echo: release everything accumulated so far.
            let buffered = std::mem::take(&mut self.buffer);
            self.echo_resolved = true;
            return emit(sanitize(&buffered));
        }

        // Echo still incomplete: keep accumulating.
        Vec::new()
    }

    /// Ends the session: best-effort flush of any unresolved buffer, then a
    /// reset to the initial state. Always succeeds; calling it on an idle
    /// cleaner is a no-op apart from the reset.
    pub fn end_session(&mut self) -> Vec<String> {
        let out = if !self.echo_resolved && !self.buffer.is_empty() {
            emit(sanitize(&self.buffer))
        } else {
            Vec::new()
        };
        self.buffer.clear();
        self.echo_resolved = false;
        out
    }
}

fn emit(cleaned: String) -> Vec<String> {
    if cleaned.is_empty() {
        Vec::new()
    } else {
        vec![cleaned]
    }
}

/// True while the buffer could still turn into an echo: it starts with the
/// blockquote marker, or a quote shows up within the probe window.
fn may_be_echo(buffer: &str) -> bool {
    buffer.starts_with('>') || buffer.chars().take(ECHO_QUOTE_PROBE).any(|c| c == '"')
}

/// Scans for a complete echo prefix and returns the byte offset just past
/// it. The shape is: a leading `>`, any non-quote run, a double-quoted span,
/// then a terminator. The terminator is either a period (consuming trailing
/// whitespace) or a whitespace run containing a newline (consumed through
/// its last newline).
fn echo_end(buffer: &str) -> Option<usize> {
    if !buffer.starts_with('>') {
        return None;
    }
    let open = buffer.find('"')?;
    let close = open + 1 + buffer[open + 1..].find('"')?;
    let tail = &buffer[close + 1..];

    if let Some(rest) = tail.strip_prefix('.') {
        let ws = rest.len() - rest.trim_start().len();
        return Some(close + 2 + ws);
    }

    let ws_len = tail.len() - tail.trim_start().len();
    let last_newline = tail[..ws_len].rfind('\n')?;
    Some(close + 1 + last_newline + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_with_newline_terminator_stripped() {
        let mut cleaner = ResponseCleaner::new();
        let out = cleaner.feed("> \u{1F3A4} \"what time is it?\"\n\nIt's 3 PM.");
        assert_eq!(out, vec!["It's 3 PM.".to_string()]);
        assert!(cleaner.is_resolved());
    }

    #[test]
    fn test_echo_split_across_two_chunks() {
        let mut cleaner = ResponseCleaner::new();
        // First chunk ends mid-echo: nothing may be emitted yet
        let first = cleaner.feed("> \u{1F3A4} \"what time");
        assert!(first.is_empty());
        assert!(!cleaner.is_resolved());

        let second = cleaner.feed(" is it?\"\n\nIt's 3 PM.");
        assert_eq!(second, vec!["It's 3 PM.".to_string()]);
        assert!(cleaner.is_resolved());
    }

    #[test]
    fn test_echo_split_across_many_chunks() {
        let mut cleaner = ResponseCleaner::new();
        let mut collected = Vec::new();
        for chunk in ["> ", "\u{1F3A4} \"wha", "t now?", "\"", "\n\n", "Sure."] {
            collected.extend(cleaner.feed(chunk));
        }
        assert_eq!(collected, vec!["Sure.".to_string()]);
    }

    #[test]
    fn test_streamed_echo_never_leaks_to_speech() {
        let mut cleaner = ResponseCleaner::new();
        let mut spoken = String::new();
        for chunk in ["> \u{1F3A4} \"what time is it?\"\n\n", "It's 3 PM."] {
            for segment in cleaner.feed(chunk) {
                spoken.push_str(&segment);
            }
        }
        spoken.extend(cleaner.end_session());
        assert!(!spoken.contains("what time is it"));
        assert_eq!(spoken.trim(), "It's 3 PM.");
    }

    #[test]
    fn test_echo_with_period_terminator() {
        let mut cleaner = ResponseCleaner::new();
        let out = cleaner.feed("> \"A broken pencil.\". A broken pencil who?");
        assert_eq!(out, vec!["A broken pencil who?".to_string()]);
    }

    #[test]
    fn test_echo_only_session_emits_nothing() {
        let mut cleaner = ResponseCleaner::new();
        assert!(cleaner.feed("> \"just the echo\"\n\n").is_empty());
        assert!(cleaner.is_resolved());
        assert!(cleaner.end_session().is_empty());
        assert!(!cleaner.is_resolved());
    }

    #[test]
    fn test_plain_response_passes_on_first_feed() {
        let mut cleaner = ResponseCleaner::new();
        let out = cleaner.feed("The weather is nice today.");
        assert_eq!(out, vec![sanitize("The weather is nice today.")]);
        assert_eq!(out, vec!["The weather is nice today.".to_string()]);
    }

    #[test]
    fn test_quote_in_probe_window_defers_emission() {
        let mut cleaner = ResponseCleaner::new();
        // Starts with a quote: could be an echo variant, so hold
        assert!(cleaner.feed("\"quoted start").is_empty());
        assert!(!cleaner.is_resolved());

        // Flush at session end releases it
        let out = cleaner.end_session();
        assert_eq!(out, vec!["\"quoted start".to_string()]);
    }

    #[test]
    fn test_quote_beyond_probe_window_is_not_an_echo() {
        let mut cleaner = ResponseCleaner::new();
        let out = cleaner.feed("He then said \"hello\" to everyone.");
        assert_eq!(out, vec!["He then said \"hello\" to everyone.".to_string()]);
    }

    #[test]
    fn test_resolved_mode_streams_each_chunk() {
        let mut cleaner = ResponseCleaner::new();
        assert_eq!(cleaner.feed("First part "), vec!["First part ".to_string()]);
        assert_eq!(
            cleaner.feed("**bold** part"),
            vec!["bold part".to_string()]
        );
    }

    #[test]
    fn test_resolved_mode_skips_empty_segments() {
        let mut cleaner = ResponseCleaner::new();
        assert!(!cleaner.feed("hi").is_empty());
        assert!(cleaner.feed("   ").is_empty());
    }

    #[test]
    fn test_remainder_is_sanitized() {
        let mut cleaner = ResponseCleaner::new();
        let out = cleaner.feed("> \"echo\"\n\n**Bold** answer");
        assert_eq!(out, vec!["Bold answer".to_string()]);
    }

    #[test]
    fn test_end_session_flushes_unresolved_buffer() {
        let mut cleaner = ResponseCleaner::new();
        assert!(cleaner.feed("> \"never finishes").is_empty());
        let out = cleaner.end_session();
        assert_eq!(out, vec!["> \"never finishes".to_string()]);
    }

    #[test]
    fn test_end_session_twice_is_noop() {
        let mut cleaner = ResponseCleaner::new();
        assert!(cleaner.end_session().is_empty());
        assert!(cleaner.end_session().is_empty());
    }

    #[test]
    fn test_session_reset_rearms_echo_detection() {
        let mut cleaner = ResponseCleaner::new();
        assert_eq!(cleaner.feed("plain"), vec!["plain".to_string()]);
        cleaner.end_session();

        // Next session must strip a fresh echo again
        let out = cleaner.feed("> \"second echo\"\n\nAnswer two.");
        assert_eq!(out, vec!["Answer two.".to_string()]);
    }

    #[test]
    fn test_zero_chunk_session() {
        let mut cleaner = ResponseCleaner::new();
        assert!(cleaner.end_session().is_empty());
        assert!(!cleaner.is_resolved());
    }

    // ── echo_end scanner edge cases ──────────────────────────────────────

    #[test]
    fn test_echo_end_period_with_trailing_whitespace() {
        let buffer = "> \"hi\".  tail";
        let end = echo_end(buffer).unwrap();
        assert_eq!(&buffer[end..], "tail");
    }

    #[test]
    fn test_echo_end_newline_run_with_interleaved_spaces() {
        // Consumed through the last newline; trailing spaces stay
        let buffer = "> \"hi\" \n \n  tail";
        let end = echo_end(buffer).unwrap();
        assert_eq!(&buffer[end..], "  tail");
    }

    #[test]
    fn test_echo_end_requires_terminator() {
        assert!(echo_end("> \"hi\"").is_none());
        assert!(echo_end("> \"hi\"  ").is_none());
        assert!(echo_end("> \"hi\" and more").is_none());
    }

    #[test]
    fn test_echo_end_requires_marker_and_quotes() {
        assert!(echo_end("\"hi\"\n\n").is_none());
        assert!(echo_end("> no quotes here\n\n").is_none());
        assert!(echo_end("> \"unclosed\n\n").is_none());
    }

    #[test]
    fn test_may_be_echo_probe_window() {
        assert!(may_be_echo("> anything"));
        assert!(may_be_echo("012345678\""));
        assert!(!may_be_echo("0123456789\""));
        assert!(!may_be_echo("plain text"));
    }
}
