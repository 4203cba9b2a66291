//! Command-line interface for voxtext
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Streaming speech-text sanitizer for voice assistants.
///
/// Reads a JSON-lines event stream on stdin (utterances, response chunks and
/// boundary signals), writes sanitized speech segments to stdout and
/// annotated transcripts to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "voxtext",
    version,
    about = "Streaming speech-text sanitizer for voice assistants"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: dropped-transcript diagnostics)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Start with spoken responses disabled (text-only marker)
    #[arg(long)]
    pub text_mode: bool,

    /// Print side-channel notifications as JSON lines on stderr
    #[arg(long)]
    pub notifications: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["voxtext"]);
        assert!(cli.config.is_none());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.text_mode);
        assert!(!cli.notifications);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "voxtext",
            "--config",
            "/tmp/voxtext.toml",
            "-q",
            "-vv",
            "--text-mode",
            "--notifications",
        ]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/voxtext.toml")));
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert!(cli.text_mode);
        assert!(cli.notifications);
    }

    #[test]
    fn test_cli_help_does_not_panic() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
