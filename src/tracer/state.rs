use crate::event::DecodedArgument;
use nix::unistd::Pid;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyscallPhase {
    AwaitingEntry,
    AwaitingExit(InFlightCall),
}

/// A syscall whose entry has been seen and whose exit has not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightCall {
    pub number: u64,
    pub name: String,
    pub args: [u64; 6],
    pub instruction_pointer: u64,
    /// Decoded only when `report` is set.
    pub arguments: Vec<DecodedArgument>,
    pub report: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProcess {
    pub pid: Pid,
    pub parent: Option<Pid>,
    pub phase: SyscallPhase,
    /// Set until the initial SIGSTOP of a freshly forked child has been seen.
    pub spawning: bool,
    pub exec_count: u64,
}

impl TrackedProcess {
    pub fn new(pid: Pid, parent: Option<Pid>) -> Self {
        Self {
            pid,
            parent,
            phase: SyscallPhase::AwaitingEntry,
            spawning: false,
            exec_count: 0,
        }
    }

    pub fn spawning(pid: Pid, parent: Option<Pid>) -> Self {
        Self {
            spawning: true,
            ..Self::new(pid, parent)
        }
    }

    pub fn is_awaiting_exit(&self) -> bool {
        matches!(self.phase, SyscallPhase::AwaitingExit(_))
    }

    /// Record a syscall entry. Returns the call that was still in flight, if
    /// any, which only happens when a stop was lost.
    pub fn enter(&mut self, call: InFlightCall) -> Option<InFlightCall> {
        match std::mem::replace(&mut self.phase, SyscallPhase::AwaitingExit(call)) {
            SyscallPhase::AwaitingExit(previous) => Some(previous),
            SyscallPhase::AwaitingEntry => None,
        }
    }

    /// Record a syscall exit, handing back the matching entry.
    pub fn exit(&mut self) -> Option<InFlightCall> {
        match std::mem::replace(&mut self.phase, SyscallPhase::AwaitingEntry) {
            SyscallPhase::AwaitingExit(call) => Some(call),
            SyscallPhase::AwaitingEntry => None,
        }
    }
}

/// Live processes keyed by pid. A process's lifetime is exactly the span
/// between its `insert` and its `remove`.
#[derive(Debug, Default)]
pub struct ProcessTable {
    processes: HashMap<Pid, TrackedProcess>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, process: TrackedProcess) -> Option<TrackedProcess> {
        self.processes.insert(process.pid, process)
    }

    pub fn get(&self, pid: Pid) -> Option<&TrackedProcess> {
        self.processes.get(&pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut TrackedProcess> {
        self.processes.get_mut(&pid)
    }

    pub fn remove(&mut self, pid: Pid) -> Option<TrackedProcess> {
        self.processes.remove(&pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Move the state tracked under `former` to `pid`. Used when a non-leader
    /// thread execs and takes over the thread group id.
    pub fn rekey(&mut self, former: Pid, pid: Pid) {
        if let Some(mut process) = self.processes.remove(&former) {
            let replaced = self.processes.remove(&pid);
            process.pid = pid;
            if process.parent.is_none() {
                process.parent = replaced.and_then(|p| p.parent);
            }
            self.processes.insert(pid, process);
        }
    }

    pub fn pids(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.processes.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
