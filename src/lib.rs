//! Follow a program and every process it spawns through their system calls.
//!
//! [`TracerSession`] launches a program under ptrace and drives it on a
//! background thread, reporting decoded syscalls, process lifecycle facts and
//! touched files to a [`TraceSink`]. The [`aggregate`] and [`output`] modules
//! turn that stream into tables, JSONL and a terminal view.

pub mod aggregate;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod output;
pub mod process;
pub mod tracer;

pub use error::{Result, SysscopeError, TracerError};
pub use event::{DecodedSyscall, FileObservation, ProcessLifecycleRecord, SessionOutcome, TraceEvent};
pub use filter::SyscallFilter;
pub use output::{ChannelSink, TraceSink};
pub use tracer::{Canceller, SessionHandle, TracerSession};
