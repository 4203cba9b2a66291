//! Station framework for pipeline threads.
//!
//! Each station runs on its own thread, pulling inputs from a bounded
//! crossbeam channel and pushing outputs downstream. A station may emit any
//! number of outputs per input, which is what the echo-stripping stage needs:
//! a chunk can produce nothing while the echo is unresolved, then a later
//! chunk releases the accumulated remainder.

use crossbeam_channel::{Receiver, Sender};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Errors that can occur during station processing.
#[derive(Debug, Clone)]
pub enum StationError {
    /// Recoverable error; the station keeps processing subsequent inputs.
    Recoverable(String),
    /// Fatal error; the station stops pumping and shuts down.
    Fatal(String),
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Recoverable(msg) => write!(f, "recoverable error: {}", msg),
            StationError::Fatal(msg) => write!(f, "fatal error: {}", msg),
        }
    }
}

impl std::error::Error for StationError {}

/// Trait for reporting station errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a station.
    fn report(&self, station: &str, error: &StationError);
}

/// Default reporter that logs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, station: &str, error: &StationError) {
        eprintln!("voxtext: [{}] {}", station, error);
    }
}

/// A single processing stage in the pipeline.
pub trait Station: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Name for logging/diagnostics.
    fn name(&self) -> &'static str;

    /// Process one input, producing zero or more outputs.
    fn process(&mut self, input: Self::Input) -> Result<Vec<Self::Output>, StationError>;

    /// Called once when the input channel closes; remaining outputs are
    /// forwarded before the station thread exits. Default: nothing buffered.
    fn flush(&mut self) -> Result<Vec<Self::Output>, StationError> {
        Ok(Vec::new())
    }

    /// Called last, after `flush`, before the thread exits.
    fn shutdown(&mut self) {}
}

/// Runs a station on its own thread, pumping inputs to outputs.
pub struct StationRunner {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl StationRunner {
    /// Spawns the station thread. The thread exits when the input channel
    /// disconnects or the downstream channel is gone.
    pub fn spawn<S: Station>(
        mut station: S,
        input: Receiver<S::Input>,
        output: Sender<S::Output>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let name = station.name();
        let handle = thread::spawn(move || {
            'pump: for item in input.iter() {
                match station.process(item) {
                    Ok(outputs) => {
                        for out in outputs {
                            if output.send(out).is_err() {
                                // Downstream gone — stop pumping.
                                break 'pump;
                            }
                        }
                    }
                    Err(err) => {
                        let fatal = matches!(err, StationError::Fatal(_));
                        reporter.report(name, &err);
                        if fatal {
                            break 'pump;
                        }
                    }
                }
            }

            // Input closed (or downstream gone): drain anything the station
            // still holds, best-effort.
            match station.flush() {
                Ok(outputs) => {
                    for out in outputs {
                        if output.send(out).is_err() {
                            break;
                        }
                    }
                }
                Err(err) => reporter.report(name, &err),
            }

            station.shutdown();
        });
        Self { name, handle }
    }

    /// Waits for the station thread to finish, surfacing panics as messages.
    pub fn join(self) -> Result<(), String> {
        self.handle.join().map_err(|panic_info| {
            let msg = panic_info
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                .unwrap_or("unknown panic");
            format!("station '{}' panicked: {}", self.name, msg)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    /// Doubles numbers; odd inputs are recoverable errors, zero is fatal.
    struct DoublerStation;

    impl Station for DoublerStation {
        type Input = u32;
        type Output = u32;

        fn name(&self) -> &'static str {
            "doubler"
        }

        fn process(&mut self, input: u32) -> Result<Vec<u32>, StationError> {
            if input == 0 {
                return Err(StationError::Fatal("zero".to_string()));
            }
            if input % 2 == 1 {
                return Err(StationError::Recoverable("odd".to_string()));
            }
            Ok(vec![input * 2])
        }
    }

    /// Holds every input and releases them all on flush.
    struct HoldingStation {
        held: Vec<String>,
    }

    impl Station for HoldingStation {
        type Input = String;
        type Output = String;

        fn name(&self) -> &'static str {
            "holding"
        }

        fn process(&mut self, input: String) -> Result<Vec<String>, StationError> {
            self.held.push(input);
            Ok(Vec::new())
        }

        fn flush(&mut self) -> Result<Vec<String>, StationError> {
            Ok(std::mem::take(&mut self.held))
        }
    }

    #[test]
    fn runner_pumps_inputs_to_outputs() {
        let (in_tx, in_rx) = bounded(8);
        let (out_tx, out_rx) = bounded(8);
        let runner = StationRunner::spawn(DoublerStation, in_rx, out_tx, Arc::new(LogReporter));

        in_tx.send(2).unwrap();
        in_tx.send(4).unwrap();
        drop(in_tx);

        let collected: Vec<u32> = out_rx.iter().collect();
        assert_eq!(collected, vec![4, 8]);
        runner.join().unwrap();
    }

    #[test]
    fn recoverable_error_keeps_station_alive() {
        let (in_tx, in_rx) = bounded(8);
        let (out_tx, out_rx) = bounded(8);
        let runner = StationRunner::spawn(DoublerStation, in_rx, out_tx, Arc::new(LogReporter));

        in_tx.send(3).unwrap(); // recoverable, no output
        in_tx.send(6).unwrap();
        drop(in_tx);

        let collected: Vec<u32> = out_rx.iter().collect();
        assert_eq!(collected, vec![12]);
        runner.join().unwrap();
    }

    #[test]
    fn fatal_error_stops_pumping() {
        let (in_tx, in_rx) = bounded(8);
        let (out_tx, out_rx) = bounded(8);
        let runner = StationRunner::spawn(DoublerStation, in_rx, out_tx, Arc::new(LogReporter));

        in_tx.send(2).unwrap();
        in_tx.send(0).unwrap(); // fatal
        in_tx.send(4).unwrap(); // never processed
        drop(in_tx);

        let collected: Vec<u32> = out_rx.iter().collect();
        assert_eq!(collected, vec![4]);
        runner.join().unwrap();
    }

    #[test]
    fn flush_outputs_are_forwarded_on_close() {
        let (in_tx, in_rx) = bounded(8);
        let (out_tx, out_rx) = bounded(8);
        let station = HoldingStation { held: Vec::new() };
        let runner = StationRunner::spawn(station, in_rx, out_tx, Arc::new(LogReporter));

        in_tx.send("a".to_string()).unwrap();
        in_tx.send("b".to_string()).unwrap();
        drop(in_tx);

        let collected: Vec<String> = out_rx.iter().collect();
        assert_eq!(collected, vec!["a".to_string(), "b".to_string()]);
        runner.join().unwrap();
    }

    #[test]
    fn join_surfaces_panic_message() {
        struct PanickingStation;
        impl Station for PanickingStation {
            type Input = ();
            type Output = ();

            fn name(&self) -> &'static str {
                "panicker"
            }

            fn process(&mut self, _input: ()) -> Result<Vec<()>, StationError> {
                panic!("boom");
            }
        }

        let (in_tx, in_rx) = bounded(1);
        let (out_tx, _out_rx) = bounded::<()>(1);
        let runner = StationRunner::spawn(PanickingStation, in_rx, out_tx, Arc::new(LogReporter));

        in_tx.send(()).unwrap();
        drop(in_tx);

        let err = runner.join().unwrap_err();
        assert!(err.contains("panicker"));
        assert!(err.contains("boom"));
    }
}
