use super::debugger::{DebugEvent, Debugger, Termination};
use super::decoder::{SyscallDecoder, DIRFD_NAMES};
use super::state::{InFlightCall, ProcessTable, TrackedProcess};
use crate::error::{TraceResult, TracerError};
use crate::event::{DecodedArgument, DecodedSyscall, FileObservation, ProcessLifecycleRecord, SessionOutcome};
use crate::filter::SyscallFilter;
use crate::output::TraceSink;
use chrono::Utc;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// No tracked process is left, or the session could not start.
    Finished,
}

/// Turns debugger events into per-process state transitions and sink
/// callbacks. Owns the process table; the debugger is borrowed per event.
pub struct Dispatcher {
    processes: ProcessTable,
    filter: SyscallFilter,
    decoder: SyscallDecoder,
    show_ip: bool,
    sink: Box<dyn TraceSink>,
    started: Instant,
    root: Option<Pid>,
    root_exit: Option<i32>,
    failure: Option<String>,
    ended: bool,
}

impl Dispatcher {
    pub fn new(sink: Box<dyn TraceSink>, filter: SyscallFilter, decoder: SyscallDecoder, show_ip: bool) -> Self {
        Self {
            processes: ProcessTable::new(),
            filter,
            decoder,
            show_ip,
            sink,
            started: Instant::now(),
            root: None,
            root_exit: None,
            failure: None,
            ended: false,
        }
    }

    /// Start tracking the launched program.
    pub fn adopt_root(&mut self, pid: Pid) {
        self.root = Some(pid);
        self.processes.insert(TrackedProcess::new(pid, None));
    }

    pub fn root(&self) -> Option<Pid> {
        self.root
    }

    pub fn tracked_pids(&self) -> Vec<Pid> {
        self.processes.pids()
    }

    pub fn dispatch(&mut self, debugger: &mut dyn Debugger, event: DebugEvent) -> TraceResult<Flow> {
        match event {
            DebugEvent::SyscallStop(pid) => self.on_syscall_stop(debugger, pid)?,
            DebugEvent::NewChild { parent, child } => self.on_new_child(debugger, parent, child)?,
            DebugEvent::Exec { pid, former } => self.on_exec(debugger, pid, former)?,
            DebugEvent::Signal { pid, signal } => self.on_signal(debugger, pid, signal)?,
            DebugEvent::Exited { pid, status } => return Ok(self.on_exited(&*debugger, pid, status)),
            DebugEvent::SpawnFailed { program, reason } => {
                log::error!("could not start {}: {}", program, reason);
                self.lifecycle(Pid::from_raw(0), "Error", reason.clone());
                self.failure = Some(reason);
                return Ok(Flow::Finished);
            }
        }
        Ok(Flow::Continue)
    }

    fn on_syscall_stop(&mut self, debugger: &mut dyn Debugger, pid: Pid) -> TraceResult<()> {
        if !self.processes.contains(pid) {
            log::warn!("syscall stop from untracked pid {}, adopting it", pid);
            self.processes.insert(TrackedProcess::new(pid, None));
        }
        let regs = debugger.syscall_registers(pid)?;
        let process = self
            .processes
            .get_mut(pid)
            .ok_or(TracerError::ProcessNotFound(pid.as_raw()))?;

        if process.is_awaiting_exit() {
            if let Some(call) = process.exit().filter(|call| call.report) {
                self.emit_call(&*debugger, pid, call, Some(regs.return_value));
            }
        } else {
            let name = debugger
                .syscall_name(regs.number)
                .map(str::to_string)
                .unwrap_or_else(|| format!("syscall_{}", regs.number));
            let report = self.filter.should_report(&name);
            let arguments = if report {
                self.decoder.decode_entry(debugger.memory(), pid, &name, &regs.args)
            } else {
                Vec::new()
            };
            let call = InFlightCall {
                number: regs.number,
                name,
                args: regs.args,
                instruction_pointer: regs.instruction_pointer,
                arguments,
                report,
            };
            if let Some(lost) = process.enter(call) {
                log::warn!("pid {} entered a syscall while {} was in flight", pid, lost.name);
            }
        }

        debugger.resume(pid, None)
    }

    fn on_new_child(&mut self, debugger: &mut dyn Debugger, parent: Pid, child: Pid) -> TraceResult<()> {
        log::debug!("pid {} spawned {}", parent, child);
        match self.processes.get_mut(child) {
            // Its initial stop overtook the fork event.
            Some(process) => process.parent = Some(parent),
            None => {
                self.processes.insert(TrackedProcess::spawning(child, Some(parent)));
            }
        }
        debugger.resume(parent, None)
    }

    fn on_exec(&mut self, debugger: &mut dyn Debugger, pid: Pid, former: Pid) -> TraceResult<()> {
        if former != pid {
            log::debug!("thread {} exec'd as {}", former, pid);
            self.processes.rekey(former, pid);
        }
        if !self.processes.contains(pid) {
            self.processes.insert(TrackedProcess::new(pid, None));
        }
        let parent = self.processes.get_mut(pid).and_then(|process| {
            process.exec_count += 1;
            process.spawning = false;
            process.parent
        });

        match debugger.inspect(pid) {
            Some(details) => {
                for (label, value) in details.facts(parent.map(|p| p.as_raw())) {
                    self.lifecycle(pid, label, value);
                }
            }
            None => log::warn!("could not read /proc details of pid {}", pid),
        }
        self.lifecycle(pid, "Status", "Process execution".to_string());

        debugger.resume(pid, None)
    }

    fn on_signal(&mut self, debugger: &mut dyn Debugger, pid: Pid, signal: Signal) -> TraceResult<()> {
        let spawning = self.processes.get(pid).map(|process| process.spawning);
        match (spawning, signal) {
            (Some(true), Signal::SIGSTOP) => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.spawning = false;
                }
                debugger.resume(pid, None)
            }
            (None, Signal::SIGSTOP) => {
                // The child's initial stop arrived before its parent's fork event.
                log::debug!("pid {} stopped before its fork was reported", pid);
                self.processes.insert(TrackedProcess::new(pid, None));
                debugger.resume(pid, None)
            }
            _ => {
                self.lifecycle(pid, "Status", format!("Process signal: {}", signal.as_str()));
                debugger.resume(pid, Some(signal))
            }
        }
    }

    fn on_exited(&mut self, debugger: &dyn Debugger, pid: Pid, status: Termination) -> Flow {
        match self.processes.remove(pid) {
            Some(mut process) => {
                if let Some(call) = process.exit().filter(|call| call.report) {
                    self.emit_call(debugger, pid, call, None);
                }
                let (label, value) = match status {
                    Termination::Code(code) => ("Exit code", code.to_string()),
                    Termination::Killed(signal) => ("Killed by signal", signal.as_str().to_string()),
                };
                self.lifecycle(pid, label, value);
                self.lifecycle(pid, "Status", "Process exit".to_string());
            }
            None => log::debug!("exit of untracked pid {}", pid),
        }

        if Some(pid) == self.root {
            self.root_exit = Some(status.exit_code());
        }
        if self.processes.is_empty() {
            Flow::Finished
        } else {
            Flow::Continue
        }
    }

    fn emit_call(&mut self, debugger: &dyn Debugger, pid: Pid, mut call: InFlightCall, result: Option<i64>) {
        if let Some(result) = result {
            self.decoder
                .decode_exit(debugger.memory(), pid, &call.name, &mut call.arguments, result);
        }
        let formatted = self.decoder.format_call(&call.name, &call.arguments, result);
        let files = file_observations(debugger, pid, &call.arguments);

        self.sink.on_syscall(DecodedSyscall {
            timestamp: Utc::now(),
            elapsed_us: self.elapsed_us(),
            pid: pid.as_raw(),
            syscall: call.name,
            syscall_nr: call.number,
            formatted,
            instruction_pointer: self.show_ip.then_some(call.instruction_pointer),
            arguments: call.arguments,
            result,
        });
        for observation in files {
            self.sink.on_file(observation);
        }
    }

    fn lifecycle(&mut self, pid: Pid, information: &str, value: String) {
        self.sink.on_lifecycle(ProcessLifecycleRecord {
            pid: pid.as_raw(),
            timestamp: Utc::now(),
            elapsed_us: self.elapsed_us(),
            information: information.to_string(),
            value,
        });
    }

    fn elapsed_us(&self) -> u64 {
        self.started.elapsed().as_micros() as u64
    }

    /// How the session ended, given whether it was cancelled.
    pub fn outcome(&self, cancelled: bool) -> SessionOutcome {
        match &self.failure {
            Some(reason) => SessionOutcome::Failed { reason: reason.clone() },
            None if cancelled => SessionOutcome::Cancelled,
            None => SessionOutcome::Completed {
                exit_code: self.root_exit,
            },
        }
    }

    /// Deliver the final callback. Later calls are ignored.
    pub fn end_session(&mut self, outcome: SessionOutcome) {
        if self.ended {
            return;
        }
        self.ended = true;
        log::debug!("session ended: {:?}", outcome);
        self.sink.on_session_ended(outcome);
    }
}

/// One observation per path argument. Relative paths are resolved against
/// the directory descriptor that precedes them, or else the tracee's cwd.
fn file_observations(debugger: &dyn Debugger, pid: Pid, arguments: &[DecodedArgument]) -> Vec<FileObservation> {
    arguments
        .iter()
        .enumerate()
        .filter_map(|(idx, arg)| {
            let path = Path::new(arg.path()?);
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                let dirfd = idx
                    .checked_sub(1)
                    .and_then(|i| arguments.get(i))
                    .filter(|prev| DIRFD_NAMES.contains(&prev.name.as_str()))
                    .map(|prev| prev.raw as i32)
                    .filter(|&fd| fd != libc::AT_FDCWD);
                let base: Option<PathBuf> = match dirfd {
                    Some(fd) => debugger.fd_path(pid, fd),
                    None => debugger.current_dir(pid),
                };
                base.map(|dir| dir.join(path)).unwrap_or_else(|| path.to_path_buf())
            };
            Some(FileObservation {
                pid: pid.as_raw(),
                existing: resolved.exists(),
                path: resolved.display().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fake {
    use super::super::arch::SyscallRegisters;
    use super::super::memory::fake::FakeMemory;
    use super::super::memory::MemoryReader;
    use super::*;
    use crate::process::{GroupIdentity, ProcessDetails, UserIdentity};
    use std::collections::{HashMap, VecDeque};

    const NAMES: &[(u64, &str)] = &[
        (0, "read"),
        (2, "open"),
        (39, "getpid"),
        (57, "fork"),
        (59, "execve"),
        (231, "exit_group"),
        (257, "openat"),
    ];

    /// Scripted stand-in for a ptrace handle.
    #[derive(Default)]
    pub struct FakeDebugger {
        pub memory: FakeMemory,
        registers: HashMap<Pid, VecDeque<SyscallRegisters>>,
        pub resumes: Vec<(Pid, Option<Signal>)>,
        pub cwd: Option<PathBuf>,
        pub fds: HashMap<i32, PathBuf>,
    }

    impl FakeDebugger {
        pub fn number(name: &str) -> u64 {
            NAMES.iter().find(|(_, n)| *n == name).map(|(nr, _)| *nr).unwrap()
        }

        pub fn push_entry(&mut self, pid: Pid, name: &str, args: [u64; 6]) {
            self.registers.entry(pid).or_default().push_back(SyscallRegisters {
                number: Self::number(name),
                args,
                return_value: -libc::ENOSYS as i64,
                instruction_pointer: 0x4000,
            });
        }

        pub fn push_raw(&mut self, pid: Pid, number: u64, args: [u64; 6], result: i64) {
            self.registers.entry(pid).or_default().push_back(SyscallRegisters {
                number,
                args,
                return_value: result,
                instruction_pointer: 0x4000,
            });
        }

        pub fn push_exit(&mut self, pid: Pid, name: &str, args: [u64; 6], result: i64) {
            self.registers.entry(pid).or_default().push_back(SyscallRegisters {
                number: Self::number(name),
                args,
                return_value: result,
                instruction_pointer: 0x4002,
            });
        }
    }

    impl Debugger for FakeDebugger {
        fn memory(&self) -> &dyn MemoryReader {
            &self.memory
        }

        fn syscall_registers(&self, pid: Pid) -> TraceResult<SyscallRegisters> {
            // Peeks; `resume` consumes the stop.
            self.registers
                .get(&pid)
                .and_then(|queue| queue.front().copied())
                .ok_or(TracerError::ProcessNotFound(pid.as_raw()))
        }

        fn syscall_name(&self, nr: u64) -> Option<&'static str> {
            NAMES.iter().find(|(n, _)| *n == nr).map(|(_, name)| *name)
        }

        fn resume(&mut self, pid: Pid, signal: Option<Signal>) -> TraceResult<()> {
            // A resume consumes the stop whose registers were just read.
            if let Some(queue) = self.registers.get_mut(&pid) {
                queue.pop_front();
            }
            self.resumes.push((pid, signal));
            Ok(())
        }

        fn inspect(&self, pid: Pid) -> Option<ProcessDetails> {
            let user = UserIdentity {
                id: 1000,
                name: Some("tester".into()),
                real_name: None,
            };
            let group = GroupIdentity {
                id: 1000,
                name: Some("tester".into()),
            };
            Some(ProcessDetails {
                pid: pid.as_raw(),
                ppid: 1,
                command_line: vec!["/bin/prog".into(), "--flag".into()],
                cwd: self.cwd.clone(),
                user: user.clone(),
                effective_user: user,
                group: group.clone(),
                effective_group: group,
            })
        }

        fn current_dir(&self, _pid: Pid) -> Option<PathBuf> {
            self.cwd.clone()
        }

        fn fd_path(&self, _pid: Pid, fd: i32) -> Option<PathBuf> {
            self.fds.get(&fd).cloned()
        }
    }
}
