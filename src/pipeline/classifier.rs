//! Utterance classifier.
//!
//! Speech recognizers hallucinate on silence and background noise: sign-off
//! phrases from training data ("thanks for watching", "please subscribe"),
//! filler sounds, stray punctuation. This module decides whether a finalized
//! transcript is worth forwarding at all.
//!
//! Pattern checks run against a scratch copy of the transcript with the
//! sentence punctuation (`.` `!` `?` `,`) removed and the case folded; the
//! original text is never mutated. Each built-in pattern anchors at the
//! start of that stripped copy.

use crate::defaults::MIN_TRANSCRIPT_LENGTH;

/// Why a transcript was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing left after trimming whitespace.
    Empty,
    /// Too short to be real speech once punctuation is stripped.
    Noise,
    /// Matches a known recognizer-hallucination pattern.
    Hallucination,
}

impl RejectReason {
    /// Lowercase label for logging and notifications.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Empty => "empty",
            RejectReason::Noise => "noise",
            RejectReason::Hallucination => "hallucination",
        }
    }
}

/// Outcome of classifying one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Forward the transcript downstream.
    Accepted,
    /// Drop the transcript.
    Rejected(RejectReason),
}

impl Classification {
    /// True when the transcript should be dropped.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Classification::Rejected(_))
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Classification::Accepted => None,
            Classification::Rejected(reason) => Some(*reason),
        }
    }
}

/// Transcript triage with the built-in pattern set plus optional
/// user-configured filter phrases.
#[derive(Debug, Clone)]
pub struct Classifier {
    min_length: usize,
    /// Extra exact-match phrases (pre-lowercased, compared against the
    /// punctuation-stripped transcript).
    extra_filters: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            min_length: MIN_TRANSCRIPT_LENGTH,
            extra_filters: Vec::new(),
        }
    }

    /// Overrides the minimum stripped length below which a transcript is noise.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Sets extra filter phrases, normalized once here (trimmed, punctuation
    /// stripped, lowercased) so runtime comparison is a plain equality check.
    pub fn with_extra_filters(mut self, filters: Vec<String>) -> Self {
        self.extra_filters = filters
            .into_iter()
            .map(|f| strip_punctuation(f.trim()).to_lowercase())
            .collect();
        self
    }

    /// Classifies one transcript. Pure: no side effects, no I/O.
    pub fn classify(&self, text: &str) -> Classification {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Classification::Rejected(RejectReason::Empty);
        }

        let stripped = strip_punctuation(trimmed);
        if stripped.chars().count() < self.min_length {
            return Classification::Rejected(RejectReason::Noise);
        }

        let normalized = stripped.to_lowercase();
        if matches_builtin_pattern(&normalized)
            || self.extra_filters.iter().any(|f| f == &normalized)
        {
            return Classification::Rejected(RejectReason::Hallucination);
        }

        Classification::Accepted
    }
}

/// Classifies with the default settings. See [`Classifier::classify`].
pub fn classify(text: &str) -> Classification {
    Classifier::new().classify(text)
}

/// True when the transcript matches a known hallucination pattern.
pub fn is_hallucination(text: &str) -> bool {
    let normalized = strip_punctuation(text.trim()).to_lowercase();
    matches_builtin_pattern(&normalized)
}

/// True when the transcript is too short to be real speech.
pub fn is_too_short(text: &str) -> bool {
    strip_punctuation(text.trim()).chars().count() < MIN_TRANSCRIPT_LENGTH
}

/// Removes every `.` `!` `?` `,` occurrence.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '.' | '!' | '?' | ','))
        .collect()
}

/// The fixed, ordered built-in pattern set. Input is stripped and lowercased.
fn matches_builtin_pattern(s: &str) -> bool {
    is_gratitude_signoff(s)
        || is_subscribe_plea(s)
        || is_like_and_subscribe(s)
        || is_farewell(s)
        || is_goodbye(s)
        || is_filler_sound(s)
        || is_dots_only(s)
}

/// "thank"/"thanks", optional "you", optional "for watching" — whole string.
fn is_gratitude_signoff(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("thank") else {
        return false;
    };
    let rest = rest.strip_prefix('s').unwrap_or(rest);
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix("you")
        .map(str::trim_start)
        .unwrap_or(rest);
    if rest.is_empty() {
        return true;
    }
    let Some(rest) = rest.strip_prefix("for") else {
        return false;
    };
    let trimmed = rest.trim_start();
    trimmed.len() < rest.len() && trimmed == "watching"
}

/// Optional "please", then anything starting with "subscribe" — prefix match.
fn is_subscribe_plea(s: &str) -> bool {
    let rest = match s.strip_prefix("please") {
        Some(r) if r.starts_with(char::is_whitespace) => r.trim_start(),
        _ => s,
    };
    rest.starts_with("subscribe")
}

/// "like and subscribe..." — prefix match.
fn is_like_and_subscribe(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("like") else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let Some(rest) = rest.trim_start().strip_prefix("and") else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    rest.trim_start().starts_with("subscribe")
}

/// "see you next time" / "see you later" / "see you soon" — prefix match.
fn is_farewell(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("see") else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let Some(rest) = rest.trim_start().strip_prefix("you") else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let rest = rest.trim_start();
    if rest.starts_with("later") || rest.starts_with("soon") {
        return true;
    }
    if let Some(rest) = rest.strip_prefix("next")
        && rest.starts_with(char::is_whitespace)
    {
        return rest.trim_start().starts_with("time");
    }
    false
}

/// "bye" with any number of trailing e's — whole string.
fn is_goodbye(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("by") else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c == 'e')
}

/// "uh", "um", "hmm" with repeated trailing letters — whole string.
fn is_filler_sound(s: &str) -> bool {
    if let Some(rest) = s.strip_prefix('u') {
        return !rest.is_empty()
            && (rest.chars().all(|c| c == 'h') || rest.chars().all(|c| c == 'm'));
    }
    if let Some(rest) = s.strip_prefix("hm") {
        return !rest.is_empty() && rest.chars().all(|c| c == 'm');
    }
    false
}

/// Only periods — whole string. Reachable for callers that skip the
/// punctuation stripping; after stripping, dot-only strings are caught by the
/// length gate instead.
fn is_dots_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '.')
}
