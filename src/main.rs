use anyhow::Result;
use clap::Parser;
use crossbeam_channel::bounded;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;
use voxtext::cli::Cli;
use voxtext::config::Config;
use voxtext::pipeline::orchestrator::{Pipeline, PipelineConfig};
use voxtext::pipeline::sink::StdoutSink;
use voxtext::pipeline::types::StreamEvent;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    // The live marker-mode flag; --text-mode wins over the config default.
    let voice_output = Arc::new(AtomicBool::new(
        config.annotator.voice_output && !cli.text_mode,
    ));

    // Optional notification drain: JSON lines on stderr
    let (notify_tx, notify_handle) = if cli.notifications {
        let (tx, rx) = bounded::<voxtext::notify::Notification>(config.channels.notify_buffer);
        let handle = thread::spawn(move || {
            for notification in rx.iter() {
                match notification.to_json() {
                    Ok(json) => eprintln!("{}", json),
                    Err(e) => eprintln!("voxtext: failed to encode notification: {e}"),
                }
            }
        });
        (Some(tx), Some(handle))
    } else {
        (None, None)
    };

    let pipeline_config = PipelineConfig {
        min_transcript_length: config.classifier.min_length,
        extra_filters: config.classifier.extra_filters.clone(),
        voice_output,
        verbosity: cli.verbose,
        event_buffer: config.channels.event_buffer,
        output_buffer: config.channels.output_buffer,
        notify_tx,
    };

    let handle = Pipeline::new(pipeline_config).start(Box::new(StdoutSink))?;

    if !cli.quiet {
        eprintln!("voxtext {} — reading events from stdin", voxtext::version_string());
    }

    let mut malformed: u64 = 0;
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StreamEvent>(&line) {
            Ok(event) => {
                if handle.send(event).is_err() {
                    // Pipeline gone; nothing more to feed.
                    break;
                }
            }
            Err(e) => {
                malformed += 1;
                if !cli.quiet {
                    eprintln!("voxtext: skipping malformed event: {e}");
                }
            }
        }
    }

    handle.stop();

    if let Some(notify_handle) = notify_handle {
        // All notification senders are gone once the pipeline stopped
        if notify_handle.join().is_err() {
            eprintln!("voxtext: notification printer panicked");
        }
    }

    if malformed > 0 && !cli.quiet {
        eprintln!("voxtext: skipped {malformed} malformed event(s)");
    }

    Ok(())
}

/// Load configuration: an explicit --config path must exist, the default
/// path may be absent.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path()),
    };
    Ok(config.with_env_overrides())
}
