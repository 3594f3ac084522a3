use super::arch::{self, Architecture, SyscallRegisters};
use super::memory::{MemoryReader, TraceeMemory};
use crate::error::{TraceResult, TracerError};
use crate::process::{self, ProcessDetails};
use nix::errno::Errno;
use nix::sys::ptrace;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;

/// One low-level debugger event, classified once by the debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugEvent {
    /// Syscall entry or exit; which one is decided by the process's phase.
    SyscallStop(Pid),
    NewChild { parent: Pid, child: Pid },
    /// `pid` executed a new image. `former` differs from `pid` when a
    /// non-leader thread called execve.
    Exec { pid: Pid, former: Pid },
    Exited { pid: Pid, status: Termination },
    Signal { pid: Pid, signal: Signal },
    SpawnFailed { program: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Code(i32),
    Killed(Signal),
}

impl Termination {
    /// Shell-style exit status: the code, or 128 + signal number.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Code(code) => code,
            Termination::Killed(sig) => 128 + sig as i32,
        }
    }
}

/// Everything the dispatcher needs from a ptrace-like handle.
pub trait Debugger {
    fn memory(&self) -> &dyn MemoryReader;
    fn syscall_registers(&self, pid: Pid) -> TraceResult<SyscallRegisters>;
    fn syscall_name(&self, nr: u64) -> Option<&'static str>;
    /// Let `pid` run to its next syscall boundary, delivering `signal` first.
    fn resume(&mut self, pid: Pid, signal: Option<Signal>) -> TraceResult<()>;
    fn inspect(&self, pid: Pid) -> Option<ProcessDetails>;
    fn current_dir(&self, pid: Pid) -> Option<PathBuf>;
    /// Path behind an open directory descriptor of `pid`.
    fn fd_path(&self, pid: Pid, fd: i32) -> Option<PathBuf>;
}

pub struct PtraceDebugger {
    architecture: Box<dyn Architecture>,
    memory: TraceeMemory,
}

impl PtraceDebugger {
    pub fn new() -> TraceResult<Self> {
        let architecture = arch::detect_architecture()?;
        log::debug!("tracing {} syscalls", architecture.name());
        Ok(Self {
            architecture,
            memory: TraceeMemory,
        })
    }

    /// Start `program` under ptrace. Returns once the child is stopped right
    /// after its initial exec with tracing options in place.
    pub fn spawn(&mut self, program: &str, args: &[String]) -> TraceResult<Pid> {
        let mut command = Command::new(program);
        // Stays in our process group so terminal reads keep working.
        command.args(args);
        unsafe {
            command.pre_exec(|| {
                ptrace::traceme()?;
                Ok(())
            });
        }

        let child = command.spawn().map_err(|source| TracerError::Spawn {
            program: program.to_string(),
            source,
        })?;
        let pid = Pid::from_raw(child.id() as i32);

        // The child reports SIGTRAP once execve has replaced its image.
        match waitpid(pid, Some(WaitPidFlag::__WALL)).map_err(TracerError::Wait)? {
            WaitStatus::Stopped(_, Signal::SIGTRAP) => {
                log::debug!("pid {} stopped after exec, setting ptrace options", pid);
            }
            other => {
                log::error!("unexpected first stop of pid {}: {:?}", pid, other);
                return Err(TracerError::Ptrace(Errno::EINVAL));
            }
        }

        let options = ptrace::Options::PTRACE_O_TRACESYSGOOD
            | ptrace::Options::PTRACE_O_TRACEFORK
            | ptrace::Options::PTRACE_O_TRACEVFORK
            | ptrace::Options::PTRACE_O_TRACECLONE
            | ptrace::Options::PTRACE_O_TRACEEXEC
            | ptrace::Options::PTRACE_O_EXITKILL;
        ptrace::setoptions(pid, options).map_err(TracerError::Ptrace)?;

        Ok(pid)
    }

    /// Block until the next event worth dispatching. `Ok(None)` means no
    /// traced children remain.
    pub fn wait(&mut self) -> TraceResult<Option<DebugEvent>> {
        loop {
            let status = match waitpid(None::<Pid>, Some(WaitPidFlag::__WALL)) {
                Ok(status) => status,
                Err(Errno::ECHILD) => return Ok(None),
                Err(e) => return Err(TracerError::Wait(e)),
            };

            let event = match status {
                WaitStatus::PtraceSyscall(pid) => DebugEvent::SyscallStop(pid),
                WaitStatus::PtraceEvent(pid, _, event) => {
                    match skip_vanished(self.ptrace_event(pid, event))? {
                        Some(Some(event)) => event,
                        _ => continue,
                    }
                }
                WaitStatus::Stopped(pid, signal) => {
                    if is_group_stop(pid, signal) {
                        log::debug!("pid {} group-stop on {:?}", pid, signal);
                        skip_vanished(self.resume(pid, None))?;
                        continue;
                    }
                    DebugEvent::Signal { pid, signal }
                }
                WaitStatus::Exited(pid, code) => DebugEvent::Exited {
                    pid,
                    status: Termination::Code(code),
                },
                WaitStatus::Signaled(pid, signal, _) => DebugEvent::Exited {
                    pid,
                    status: Termination::Killed(signal),
                },
                WaitStatus::Continued(_) | WaitStatus::StillAlive => continue,
            };
            return Ok(Some(event));
        }
    }

    fn ptrace_event(&mut self, pid: Pid, event: i32) -> TraceResult<Option<DebugEvent>> {
        match event {
            libc::PTRACE_EVENT_FORK | libc::PTRACE_EVENT_VFORK | libc::PTRACE_EVENT_CLONE => {
                let child = ptrace::getevent(pid).map_err(TracerError::Ptrace)?;
                Ok(Some(DebugEvent::NewChild {
                    parent: pid,
                    child: Pid::from_raw(child as i32),
                }))
            }
            libc::PTRACE_EVENT_EXEC => {
                let former = ptrace::getevent(pid).map_err(TracerError::Ptrace)?;
                Ok(Some(DebugEvent::Exec {
                    pid,
                    former: Pid::from_raw(former as i32),
                }))
            }
            other => {
                log::debug!("pid {} ignoring ptrace event {}", pid, other);
                self.resume(pid, None)?;
                Ok(None)
            }
        }
    }

    /// SIGKILL every listed tracee, then reap until no children are left.
    pub fn kill_all(&mut self, pids: &[Pid]) {
        for &pid in pids {
            ignore_missing(signal::kill(pid, Signal::SIGKILL));
        }

        loop {
            match waitpid(None::<Pid>, Some(WaitPidFlag::__WALL)) {
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {}
                // A tracee we never heard of; it is ours to kill as well.
                Ok(status) => {
                    if let Some(pid) = status.pid() {
                        ignore_missing(signal::kill(pid, Signal::SIGKILL));
                    }
                }
                Err(Errno::EINTR) => {}
                Err(Errno::ECHILD) => break,
                Err(e) => {
                    log::warn!("reaping tracees failed: {}", e);
                    break;
                }
            }
        }
    }
}

impl Debugger for PtraceDebugger {
    fn memory(&self) -> &dyn MemoryReader {
        &self.memory
    }

    fn syscall_registers(&self, pid: Pid) -> TraceResult<SyscallRegisters> {
        self.architecture.syscall_registers(pid)
    }

    fn syscall_name(&self, nr: u64) -> Option<&'static str> {
        self.architecture.syscall_name(nr)
    }

    fn resume(&mut self, pid: Pid, signal: Option<Signal>) -> TraceResult<()> {
        ptrace::syscall(pid, signal).map_err(TracerError::Ptrace)
    }

    fn inspect(&self, pid: Pid) -> Option<ProcessDetails> {
        process::read_process_details(pid.as_raw())
    }

    fn current_dir(&self, pid: Pid) -> Option<PathBuf> {
        process::current_dir(pid.as_raw())
    }

    fn fd_path(&self, pid: Pid, fd: i32) -> Option<PathBuf> {
        process::fd_path(pid.as_raw(), fd)
    }
}

/// Without PTRACE_SEIZE a group-stop looks like a stopping signal; only
/// PTRACE_GETSIGINFO failing with EINVAL tells them apart.
fn is_group_stop(pid: Pid, signal: Signal) -> bool {
    matches!(
        signal,
        Signal::SIGSTOP | Signal::SIGTSTP | Signal::SIGTTIN | Signal::SIGTTOU
    ) && matches!(ptrace::getsiginfo(pid), Err(Errno::EINVAL))
}

/// A tracee killed between `waitpid` and the ptrace request fails with
/// ESRCH. Its exit is still reported by a later wait, so the stop is dropped.
fn skip_vanished<T>(result: TraceResult<T>) -> TraceResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_benign() => {
            log::debug!("tracee vanished while handling its stop: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn ignore_missing(result: nix::Result<()>) {
    match result {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => log::warn!("kill failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_exit_codes() {
        assert_eq!(Termination::Code(3).exit_code(), 3);
        assert_eq!(Termination::Killed(Signal::SIGKILL).exit_code(), 137);
        assert_eq!(Termination::Killed(Signal::SIGSEGV).exit_code(), 139);
    }

    #[test]
    fn vanished_tracee_is_skipped() {
        let gone: TraceResult<()> = Err(TracerError::Ptrace(Errno::ESRCH));
        assert!(matches!(skip_vanished(gone), Ok(None)));
        assert!(matches!(skip_vanished(Ok(7)), Ok(Some(7))));

        let denied: TraceResult<()> = Err(TracerError::Ptrace(Errno::EPERM));
        assert!(matches!(skip_vanished(denied), Err(TracerError::Ptrace(Errno::EPERM))));
    }

    #[test]
    fn spawn_missing_program_fails() {
        let mut debugger = PtraceDebugger::new().unwrap();
        let err = debugger
            .spawn("/nonexistent/sysscope-test-binary", &[])
            .unwrap_err();
        assert!(matches!(err, TracerError::Spawn { .. }));
        assert!(!err.is_recoverable());
    }
}
