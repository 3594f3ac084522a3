use crate::error::{TraceResult, TracerError};
use crate::event::SessionOutcome;
use crate::filter::SyscallFilter;
use crate::output::TraceSink;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub mod arch;
pub mod debugger;
pub mod decoder;
pub mod dispatch;
pub mod memory;
pub mod state;

use debugger::{DebugEvent, PtraceDebugger};
use decoder::{DecodeOptions, SyscallDecoder};
use dispatch::{Dispatcher, Flow};

/// Configures and launches one traced program.
pub struct TracerSession {
    program: String,
    args: Vec<String>,
    filter: SyscallFilter,
    decode_options: DecodeOptions,
    show_ip: bool,
}

impl TracerSession {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            filter: SyscallFilter::default(),
            decode_options: DecodeOptions::default(),
            show_ip: false,
        }
    }

    pub fn filter(mut self, filter: SyscallFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn decode_options(mut self, options: DecodeOptions) -> Self {
        self.decode_options = options;
        self
    }

    pub fn show_ip(mut self, show_ip: bool) -> Self {
        self.show_ip = show_ip;
        self
    }

    /// Spawn the program and trace it on a background thread. Every callback,
    /// including the final `on_session_ended`, runs on that thread.
    ///
    /// Only one session may be live per process: the loop waits on any child.
    pub fn start(self, sink: impl TraceSink + 'static) -> TraceResult<SessionHandle> {
        let control = Arc::new(SessionControl::default());
        let thread_control = Arc::clone(&control);

        let thread = thread::Builder::new()
            .name("sysscope-tracer".into())
            .spawn(move || self.run(Box::new(sink), &thread_control))
            .map_err(TracerError::Thread)?;

        Ok(SessionHandle {
            control,
            thread: Some(thread),
        })
    }

    fn run(self, sink: Box<dyn TraceSink>, control: &SessionControl) {
        let decoder = SyscallDecoder::new(self.decode_options);
        let mut dispatcher = Dispatcher::new(sink, self.filter, decoder, self.show_ip);

        let outcome = match PtraceDebugger::new() {
            Ok(mut debugger) => {
                let outcome = trace(&mut debugger, &mut dispatcher, &self.program, &self.args, control);
                control.root.store(0, Ordering::SeqCst);
                outcome
            }
            Err(e) => SessionOutcome::Failed { reason: e.to_string() },
        };
        dispatcher.end_session(outcome);
    }
}

fn trace(
    debugger: &mut PtraceDebugger,
    dispatcher: &mut Dispatcher,
    program: &str,
    args: &[String],
    control: &SessionControl,
) -> SessionOutcome {
    let root = match debugger.spawn(program, args) {
        Ok(pid) => pid,
        Err(e) => {
            let reason = match &e {
                TracerError::Spawn { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            let event = DebugEvent::SpawnFailed {
                program: program.to_string(),
                reason,
            };
            if let Err(e) = dispatcher.dispatch(debugger, event) {
                log::warn!("reporting spawn failure: {}", e);
            }
            return dispatcher.outcome(false);
        }
    };
    log::info!("tracing {} as pid {}", program, root);

    // Publish the root before reading the flag so a concurrent cancel either
    // sees the pid or is seen here.
    control.root.store(root.as_raw(), Ordering::SeqCst);
    dispatcher.adopt_root(root);

    let result = event_loop(debugger, dispatcher, root, control);
    debugger.kill_all(&dispatcher.tracked_pids());

    match result {
        Ok(()) => dispatcher.outcome(control.is_cancelled()),
        Err(e) => {
            log::error!("tracing aborted: {}", e);
            SessionOutcome::Failed { reason: e.to_string() }
        }
    }
}

fn event_loop(
    debugger: &mut PtraceDebugger,
    dispatcher: &mut Dispatcher,
    root: Pid,
    control: &SessionControl,
) -> TraceResult<()> {
    let mut next = Some(DebugEvent::Exec { pid: root, former: root });

    loop {
        if control.is_cancelled() {
            log::info!("session cancelled");
            return Ok(());
        }

        let event = match next.take() {
            Some(event) => event,
            None => match debugger.wait() {
                Ok(Some(event)) => event,
                Ok(None) => {
                    log::debug!("no traced children left");
                    return Ok(());
                }
                Err(e) => {
                    survive_wait_error(e)?;
                    continue;
                }
            },
        };

        match dispatcher.dispatch(debugger, event) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Finished) => return Ok(()),
            Err(e) if e.is_benign() => log::debug!("tracee vanished: {}", e),
            Err(e) if e.is_recoverable() => log::warn!("event skipped: {}", e),
            Err(e) => return Err(e),
        }
    }
}

/// Missing tracees and interrupted waits are logged and the loop goes on;
/// anything else ends the session.
fn survive_wait_error(e: TracerError) -> TraceResult<()> {
    if e.is_benign() {
        log::debug!("tracee vanished during wait: {}", e);
        Ok(())
    } else if e.is_recoverable() {
        log::warn!("wait failed, continuing: {}", e);
        Ok(())
    } else {
        Err(e)
    }
}

/// State shared between the tracer thread and its handle.
#[derive(Debug, Default)]
struct SessionControl {
    cancelled: AtomicBool,
    /// Pid of the launched program while it is being traced, else 0.
    root: AtomicI32,
}

impl SessionControl {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        // The root's death wakes the tracer out of its blocking wait; the
        // teardown kills whatever else is still tracked.
        let root = self.root.load(Ordering::SeqCst);
        if root > 0 {
            match signal::kill(Pid::from_raw(root), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => log::warn!("killing pid {} failed: {}", root, e),
            }
        }
    }
}

/// Handle to a running session. Dropping it cancels and joins.
pub struct SessionHandle {
    control: Arc<SessionControl>,
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Ask the session to stop. Safe to call any number of times, also after
    /// the session has finished on its own.
    pub fn cancel(&self) {
        if self.is_finished() {
            return;
        }
        self.control.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// A cheap, cloneable way to cancel from elsewhere, e.g. a signal handler.
    pub fn canceller(&self) -> Canceller {
        Canceller {
            control: Arc::clone(&self.control),
        }
    }

    /// Wait for the tracer thread to finish.
    pub fn join(mut self) {
        self.join_thread();
    }

    fn join_thread(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("tracer thread panicked");
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if !self.is_finished() {
            self.control.cancel();
        }
        self.join_thread();
    }
}

#[derive(Clone)]
pub struct Canceller {
    control: Arc<SessionControl>,
}

impl Canceller {
    pub fn cancel(&self) {
        self.control.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_idempotent_without_a_root() {
        let control = SessionControl::default();
        control.cancel();
        control.cancel();
        assert!(control.is_cancelled());
    }

    #[test]
    fn missing_tracee_during_wait_keeps_the_loop_going() {
        assert!(survive_wait_error(TracerError::Ptrace(Errno::ESRCH)).is_ok());
        assert!(survive_wait_error(TracerError::Wait(Errno::EINTR)).is_ok());
        assert!(survive_wait_error(TracerError::ProcessNotFound(42)).is_ok());
        assert!(matches!(
            survive_wait_error(TracerError::Wait(Errno::EINVAL)),
            Err(TracerError::Wait(Errno::EINVAL))
        ));
        assert!(survive_wait_error(TracerError::Ptrace(Errno::EPERM)).is_err());
    }

    #[test]
    fn builder_keeps_settings() {
        let session = TracerSession::new("/bin/true", vec!["x".into()])
            .filter(SyscallFilter::from_names(["read"]))
            .decode_options(DecodeOptions {
                string_max_length: 10,
                max_array_count: 2,
            })
            .show_ip(true);
        assert_eq!(session.program, "/bin/true");
        assert_eq!(session.args, vec!["x".to_string()]);
        assert!(session.filter.should_report("read"));
        assert!(!session.filter.should_report("write"));
        assert_eq!(session.decode_options.string_max_length, 10);
        assert!(session.show_ip);
    }
}
