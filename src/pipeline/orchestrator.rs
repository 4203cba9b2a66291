//! Pipeline that runs from startup until shutdown.
//!
//! Wires the stream controller and the sink as stations on their own
//! threads, connected by bounded channels: events in, controller, sink out.
//! The linear chain preserves the strict ordering the stream contract
//! requires; one pipeline serves one conversation.

use crate::defaults;
use crate::error::{Result, VoxtextError};
use crate::notify::Notification;
use crate::pipeline::annotator::Annotator;
use crate::pipeline::classifier::Classifier;
use crate::pipeline::controller::StreamController;
use crate::pipeline::sink::{OutputSink, SinkStation};
use crate::pipeline::station::{ErrorReporter, LogReporter, StationRunner};
use crate::pipeline::types::StreamEvent;
use crossbeam_channel::{Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum stripped transcript length below which classification drops it.
    pub min_transcript_length: usize,
    /// Extra exact-match hallucination phrases.
    pub extra_filters: Vec<String>,
    /// Live marker-mode flag, shared with the control plane.
    pub voice_output: Arc<AtomicBool>,
    /// Verbosity level (0=silent, 1=dropped-transcript diagnostics).
    pub verbosity: u8,
    /// Controller input channel capacity.
    pub event_buffer: usize,
    /// Controller-to-sink channel capacity.
    pub output_buffer: usize,
    /// Optional notification side channel (crossbeam, non-blocking).
    pub notify_tx: Option<Sender<Notification>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_transcript_length: defaults::MIN_TRANSCRIPT_LENGTH,
            extra_filters: Vec::new(),
            voice_output: Arc::new(AtomicBool::new(true)),
            verbosity: 0,
            event_buffer: defaults::EVENT_BUFFER,
            output_buffer: defaults::OUTPUT_BUFFER,
            notify_tx: None,
        }
    }
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    /// Sender side of the event stream; dropped on stop to cascade shutdown.
    events: Option<Sender<StreamEvent>>,
    /// Flag to signal shutdown
    running: Arc<AtomicBool>,
    /// Join handles for spawned threads
    threads: Vec<JoinHandle<()>>,
    /// Receiver for sink's finish() result
    result_rx: Option<crossbeam_channel::Receiver<Option<String>>>,
}

impl PipelineHandle {
    /// Sends one event into the pipeline, blocking if the input buffer is
    /// full. Fails once the pipeline has shut down.
    pub fn send(&self, event: StreamEvent) -> Result<()> {
        let Some(ref events) = self.events else {
            return Err(VoxtextError::ChannelClosed {
                stage: "events".to_string(),
            });
        };
        events.send(event).map_err(|_| VoxtextError::ChannelClosed {
            stage: "controller".to_string(),
        })
    }

    /// Clones the event sender for an external producer.
    ///
    /// Every clone must be dropped before `stop` can drain the pipeline.
    pub fn events(&self) -> Option<Sender<StreamEvent>> {
        self.events.clone()
    }

    /// Stops the pipeline gracefully and returns the sink's accumulated
    /// result.
    ///
    /// Closing the event stream lets the controller flush any unresolved
    /// session before the sink reports. Waits up to 5s for the result, then
    /// 1s for threads to finish; remaining threads are detached after the
    /// deadline and die with the process.
    pub fn stop(mut self) -> Option<String> {
        // Signal shutdown and close the event stream
        self.running.store(false, Ordering::SeqCst);
        drop(self.events.take());

        // The result may arrive before all threads finish joining
        let result = self
            .result_rx
            .as_ref()
            .and_then(|rx| rx.recv_timeout(Duration::from_secs(5)).ok().flatten());

        // Wait up to 1s more for threads, joining completed ones to detect
        // panics
        let deadline = Instant::now() + Duration::from_secs(1);
        let poll_interval = Duration::from_millis(10);

        loop {
            let mut remaining = Vec::new();
            for handle in self.threads.drain(..) {
                if handle.is_finished() {
                    if let Err(panic_info) = handle.join() {
                        let msg = panic_info
                            .downcast_ref::<&str>()
                            .copied()
                            .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                            .unwrap_or("unknown panic");
                        eprintln!("voxtext: pipeline thread panicked: {msg}");
                    }
                } else {
                    remaining.push(handle);
                }
            }
            self.threads = remaining;

            if self.threads.is_empty() {
                break;
            }

            if Instant::now() >= deadline {
                eprintln!(
                    "voxtext: shutdown timeout — {} thread(s) still running, detaching",
                    self.threads.len()
                );
                // Dropping JoinHandles detaches threads; they die with the process.
                break;
            }

            thread::sleep(poll_interval);
        }

        result
    }

    /// Returns true if the pipeline is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Text pipeline: events → StreamController → OutputSink.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
}

impl Pipeline {
    /// Creates a new pipeline with the default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Starts the pipeline, returning a handle used to push events and to
    /// stop it.
    pub fn start(self, sink: Box<dyn OutputSink>) -> Result<PipelineHandle> {
        let running = Arc::new(AtomicBool::new(true));

        // Channels between stations
        let (event_tx, event_rx) = bounded(self.config.event_buffer);
        let (output_tx, output_rx) = bounded(self.config.output_buffer);

        // Controller station with per-conversation state
        let classifier = Classifier::new()
            .with_min_length(self.config.min_transcript_length)
            .with_extra_filters(self.config.extra_filters.clone());
        let annotator = Annotator::new(self.config.voice_output.clone());
        let mut controller = StreamController::new(classifier, annotator)
            .with_verbose(self.config.verbosity >= 1);
        if let Some(ref notify_tx) = self.config.notify_tx {
            controller = controller.with_event_sender(notify_tx.clone());
        }

        // Sink station with result channel
        let (result_tx, result_rx) = bounded(1);
        let sink_station = SinkStation::new(sink, result_tx);

        // Spawn station runners
        let controller_runner = StationRunner::spawn(
            controller,
            event_rx,
            output_tx,
            self.error_reporter.clone(),
        );

        // The terminal station gets a dummy output channel
        let (sink_out_tx, sink_out_rx) = bounded::<()>(1);
        let sink_runner = StationRunner::spawn(
            sink_station,
            output_rx,
            sink_out_tx,
            self.error_reporter.clone(),
        );

        // Drain the sink's (empty) output until it disconnects
        let drain_handle = thread::spawn(move || for () in sink_out_rx.iter() {});

        // Wrap runner join handles so panics surface on stop
        let mut threads = vec![drain_handle];
        threads.push(thread::spawn(move || {
            if let Err(msg) = controller_runner.join() {
                eprintln!("voxtext: {msg}");
            }
        }));
        threads.push(thread::spawn(move || {
            if let Err(msg) = sink_runner.join() {
                eprintln!("voxtext: {msg}");
            }
        }));

        Ok(PipelineHandle {
            events: Some(event_tx),
            running,
            threads,
            result_rx: Some(result_rx),
        })
    }
}

/// Creates a notification channel sized per the defaults.
pub fn notification_channel()
-> (Sender<Notification>, crossbeam_channel::Receiver<Notification>) {
    bounded(defaults::NOTIFY_BUFFER)
}
