use super::TraceSink;
use crate::event::{DecodedSyscall, FileObservation, ProcessLifecycleRecord, SessionOutcome, TraceEvent};
use std::sync::mpsc::{self, Receiver, Sender};

/// Forwards every callback as a [`TraceEvent`] to another thread.
pub struct ChannelSink {
    tx: Sender<TraceEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<TraceEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, Receiver<TraceEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: TraceEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("trace event dropped, receiver is gone");
        }
    }
}

impl TraceSink for ChannelSink {
    fn on_syscall(&mut self, call: DecodedSyscall) {
        self.send(TraceEvent::Syscall(call));
    }

    fn on_lifecycle(&mut self, record: ProcessLifecycleRecord) {
        self.send(TraceEvent::Process(record));
    }

    fn on_file(&mut self, observation: FileObservation) {
        self.send(TraceEvent::File(observation));
    }

    fn on_session_ended(&mut self, outcome: SessionOutcome) {
        self.send(TraceEvent::Ended(outcome));
    }
}
