//! Default configuration constants for voxtext.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Minimum character count for a transcript to count as real speech.
///
/// Measured after stripping sentence punctuation. Single-character results
/// are almost always recognizer noise (a stray "a", a lone "?").
pub const MIN_TRANSCRIPT_LENGTH: usize = 2;

/// Leading window of a response buffer probed for a quote character.
///
/// While the echo prefix is still incomplete, a quote within this window is
/// the signal to keep accumulating. The constant mirrors the echo format of
/// the upstream generator and must not be widened speculatively.
pub const ECHO_QUOTE_PROBE: usize = 10;

/// Spoken placeholder substituted for fenced code blocks.
///
/// Padded with spaces so it joins cleanly with surrounding prose before
/// whitespace collapsing runs.
pub const CODE_BLOCK_PLACEHOLDER: &str = " (code block omitted) ";

/// Marker prefixed to transcripts while spoken responses are enabled.
pub const VOICE_MARKER: char = '\u{1F3A4}';

/// Marker prefixed to transcripts while responses are text-only.
pub const TEXT_MARKER: char = '\u{1F4D6}';

/// Default capacity of the controller's input event channel.
pub const EVENT_BUFFER: usize = 256;

/// Default capacity of the controller-to-sink output channel.
pub const OUTPUT_BUFFER: usize = 256;

/// Default capacity of the notification side channel.
///
/// Generous because delivery is fire-and-forget: a slow UI consumer loses
/// notifications rather than stalling the pipeline.
pub const NOTIFY_BUFFER: usize = 1024;
