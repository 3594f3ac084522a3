use crate::error::OutputError;
use crate::event::{DecodedSyscall, FileObservation, ProcessLifecycleRecord, SessionOutcome, TraceEvent};
use std::fs::File;

pub mod channel;
pub mod jsonl;
pub mod terminal;

pub use channel::ChannelSink;

/// Callbacks the tracer invokes from its own thread. Implementations that
/// need the values elsewhere hand them off themselves.
pub trait TraceSink: Send {
    fn on_syscall(&mut self, call: DecodedSyscall);
    fn on_lifecycle(&mut self, record: ProcessLifecycleRecord);
    fn on_file(&mut self, _observation: FileObservation) {}
    /// Called exactly once per session, whatever ended it.
    fn on_session_ended(&mut self, outcome: SessionOutcome);
}

/// A display target fed on the presentation thread.
pub trait OutputSink {
    fn emit(&mut self, event: &TraceEvent) -> Result<(), OutputError>;
    fn flush(&mut self) -> Result<(), OutputError>;
}

pub struct OutputManager {
    sinks: Vec<Box<dyn OutputSink>>,
}

impl OutputManager {
    /// JSONL goes to `jsonl_output` or stdout. The terminal view on stderr is
    /// added when asked for with `-v` or when stdout is free of JSONL.
    pub fn new(jsonl_output: Option<File>, verbosity: u8, no_color: bool, show_ip: bool) -> Self {
        let mut sinks: Vec<Box<dyn OutputSink>> = Vec::new();
        let output_to_file = jsonl_output.is_some();

        match jsonl_output {
            Some(file) => sinks.push(Box::new(jsonl::JsonlSink::new_file(file))),
            None => sinks.push(Box::new(jsonl::JsonlSink::new_stdout())),
        }

        if verbosity > 0 || output_to_file {
            sinks.push(Box::new(terminal::TerminalSink::new(verbosity, no_color, show_ip)));
        }

        Self { sinks }
    }

    pub fn with_sinks(sinks: Vec<Box<dyn OutputSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Box<dyn OutputSink>) {
        self.sinks.push(sink);
    }

    pub fn emit(&mut self, event: &TraceEvent) -> Result<(), OutputError> {
        for sink in &mut self.sinks {
            sink.emit(event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl OutputSink for Recorder {
        fn emit(&mut self, event: &TraceEvent) -> Result<(), OutputError> {
            let json = serde_json::to_value(event)?;
            self.0.lock().unwrap().push(json["event_type"].as_str().unwrap().to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), OutputError> {
            Ok(())
        }
    }

    #[test]
    fn manager_fans_out_to_every_sink() {
        let a = Recorder::default();
        let b = Recorder::default();
        let mut manager = OutputManager::with_sinks(vec![Box::new(a.clone())]);
        manager.push(Box::new(b.clone()));

        manager.emit(&TraceEvent::Ended(SessionOutcome::Cancelled)).unwrap();
        manager.flush().unwrap();

        assert_eq!(*a.0.lock().unwrap(), vec!["ended"]);
        assert_eq!(*b.0.lock().unwrap(), vec!["ended"]);
    }
}
