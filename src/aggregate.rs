use crate::catalog;
use crate::error::OutputError;
use crate::event::*;
use crate::output::OutputSink;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of entries in the summary's call ranking when only called
/// syscalls are listed.
pub const TOP_SYSCALLS: usize = 10;

/// One reported syscall as a flat row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub timestamp: DateTime<Utc>,
    pub elapsed_us: u64,
    pub syscall: String,
    pub formatted: String,
    pub pid: i32,
    pub instruction_pointer: Option<u64>,
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    rows: Vec<ActivityRow>,
}

impl ActivityLog {
    pub fn push(&mut self, call: &DecodedSyscall) {
        self.rows.push(ActivityRow {
            timestamp: call.timestamp,
            elapsed_us: call.elapsed_us,
            syscall: call.syscall.clone(),
            formatted: call.formatted.clone(),
            pid: call.pid,
            instruction_pointer: call.instruction_pointer,
        });
    }

    pub fn rows(&self) -> &[ActivityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Per-syscall call counters. Every catalog name starts at zero so the
/// full table can be shown, not just what was called.
#[derive(Debug, Clone)]
pub struct SyscallCounts {
    counts: BTreeMap<String, u64>,
}

impl Default for SyscallCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl SyscallCounts {
    pub fn new() -> Self {
        Self {
            counts: catalog::all_names().into_iter().map(|n| (n.to_string(), 0)).collect(),
        }
    }

    /// Returns the new count. Names outside the catalog are added on first use.
    pub fn increment(&mut self, name: &str) -> u64 {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.counts.get(name).copied()
    }

    pub fn all(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }

    pub fn called(&self) -> impl Iterator<Item = (&str, u64)> {
        self.all().filter(|&(_, count)| count > 0)
    }

    /// Highest counts first, ties by name.
    pub fn ranked(&self, only_called: bool) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = if only_called {
            self.called().map(|(n, c)| (n.to_string(), c)).collect()
        } else {
            self.all().map(|(n, c)| (n.to_string(), c)).collect()
        };
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    pub fn clear_values(&mut self) {
        self.counts.values_mut().for_each(|count| *count = 0);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub existing: bool,
}

/// Files touched by each process, in first-seen order, each path once per pid.
#[derive(Debug, Default)]
pub struct FileTable {
    by_pid: BTreeMap<i32, Vec<FileEntry>>,
    seen: HashSet<(i32, String)>,
}

impl FileTable {
    /// Returns false when the pid already touched this path.
    pub fn add(&mut self, observation: &FileObservation) -> bool {
        if !self.seen.insert((observation.pid, observation.path.clone())) {
            return false;
        }
        self.by_pid.entry(observation.pid).or_default().push(FileEntry {
            path: observation.path.clone(),
            existing: observation.existing,
        });
        true
    }

    pub fn for_pid(&self, pid: i32) -> &[FileEntry] {
        self.by_pid.get(&pid).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pids(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_pid.keys().copied()
    }

    pub fn only_existing(&self) -> Vec<(i32, &FileEntry)> {
        self.by_pid
            .iter()
            .flat_map(|(&pid, entries)| entries.iter().map(move |e| (pid, e)))
            .filter(|(_, e)| e.existing)
            .collect()
    }

    /// Every distinct path across all processes, sorted.
    pub fn paths(&self, only_existing: bool) -> Vec<String> {
        let mut paths: Vec<String> = self
            .by_pid
            .values()
            .flatten()
            .filter(|e| e.existing || !only_existing)
            .map(|e| e.path.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_pid.clear();
        self.seen.clear();
    }
}

/// Lifecycle records grouped per pid, groups in order of first appearance.
#[derive(Debug, Default)]
pub struct ProcessLog {
    order: Vec<i32>,
    records: HashMap<i32, Vec<ProcessLifecycleRecord>>,
}

impl ProcessLog {
    pub fn add(&mut self, record: &ProcessLifecycleRecord) {
        let group = self.records.entry(record.pid).or_insert_with(|| {
            self.order.push(record.pid);
            Vec::new()
        });
        group.push(record.clone());
    }

    pub fn groups(&self) -> impl Iterator<Item = (i32, &[ProcessLifecycleRecord])> {
        self.order
            .iter()
            .filter_map(|pid| self.records.get(pid).map(|records| (*pid, records.as_slice())))
    }

    pub fn for_pid(&self, pid: i32) -> &[ProcessLifecycleRecord] {
        self.records.get(&pid).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pids of real processes; pid 0 only carries session errors.
    pub fn process_count(&self) -> usize {
        self.order.iter().filter(|&&pid| pid > 0).count()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
    }
}

/// Everything a presentation layer keeps about a session.
#[derive(Debug, Default)]
pub struct Aggregates {
    pub activity: ActivityLog,
    pub counts: SyscallCounts,
    pub files: FileTable,
    pub processes: ProcessLog,
    pub outcome: Option<SessionOutcome>,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &TraceEvent) {
        match event {
            TraceEvent::Syscall(call) => {
                self.activity.push(call);
                self.counts.increment(&call.syscall);
            }
            TraceEvent::Process(record) => self.processes.add(record),
            TraceEvent::File(observation) => {
                self.files.add(observation);
            }
            TraceEvent::Ended(outcome) => self.outcome = Some(outcome.clone()),
            TraceEvent::Summary(_) => {}
        }
    }

    pub fn summary(&self, duration_ms: u64, counts_only_called: bool, files_only_existing: bool) -> TraceSummary {
        let mut top_syscalls = self.counts.ranked(counts_only_called);
        if counts_only_called {
            top_syscalls.truncate(TOP_SYSCALLS);
        }
        TraceSummary {
            timestamp: Utc::now(),
            total_syscalls: self.activity.len() as u64,
            unique_syscalls: self.counts.called().count() as u64,
            process_count: self.processes.process_count() as u64,
            duration_ms,
            outcome: self
                .outcome
                .clone()
                .unwrap_or(SessionOutcome::Completed { exit_code: None }),
            top_syscalls,
            files_accessed: self.files.paths(files_only_existing),
        }
    }

    pub fn clear(&mut self) {
        self.activity.clear();
        self.counts.clear_values();
        self.files.clear();
        self.processes.clear();
        self.outcome = None;
    }
}

impl OutputSink for Aggregates {
    fn emit(&mut self, event: &TraceEvent) -> Result<(), OutputError> {
        self.record(event);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(pid: i32, name: &str) -> TraceEvent {
        TraceEvent::Syscall(DecodedSyscall {
            timestamp: Utc::now(),
            elapsed_us: 1,
            pid,
            syscall: name.into(),
            syscall_nr: 0,
            formatted: format!("{name}() = 0"),
            instruction_pointer: None,
            arguments: Vec::new(),
            result: Some(0),
        })
    }

    fn file(pid: i32, path: &str, existing: bool) -> TraceEvent {
        TraceEvent::File(FileObservation {
            pid,
            path: path.into(),
            existing,
        })
    }

    fn record(pid: i32, information: &str) -> TraceEvent {
        TraceEvent::Process(ProcessLifecycleRecord {
            pid,
            timestamp: Utc::now(),
            elapsed_us: 0,
            information: information.into(),
            value: String::new(),
        })
    }

    #[test]
    fn counts_preload_catalog_and_keep_names_on_clear() {
        let mut counts = SyscallCounts::new();
        assert_eq!(counts.get("read"), Some(0));
        assert_eq!(counts.called().count(), 0);

        counts.increment("read");
        assert_eq!(counts.increment("read"), 2);
        counts.increment("syscall_999");
        let called: Vec<(&str, u64)> = counts.called().collect();
        assert_eq!(called, vec![("read", 2), ("syscall_999", 1)]);

        counts.clear_values();
        assert_eq!(counts.called().count(), 0);
        assert_eq!(counts.get("syscall_999"), Some(0));
    }

    #[test]
    fn ranking_orders_by_count_then_name() {
        let mut counts = SyscallCounts::new();
        for name in ["write", "read", "write", "close"] {
            counts.increment(name);
        }
        let ranked = counts.ranked(true);
        assert_eq!(
            ranked,
            vec![("write".to_string(), 2), ("close".to_string(), 1), ("read".to_string(), 1)]
        );
        assert_eq!(counts.ranked(false).len(), counts.all().count());
    }

    #[test]
    fn files_deduplicate_per_pid_only() {
        let mut files = FileTable::default();
        let obs = |pid, path: &str| FileObservation {
            pid,
            path: path.into(),
            existing: path != "/missing",
        };
        assert!(files.add(&obs(1, "/etc/hosts")));
        assert!(!files.add(&obs(1, "/etc/hosts")));
        assert!(files.add(&obs(2, "/etc/hosts")));
        assert!(files.add(&obs(1, "/missing")));

        assert_eq!(files.len(), 3);
        assert_eq!(files.for_pid(1).len(), 2);
        assert_eq!(files.pids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(files.only_existing().len(), 2);
        assert_eq!(files.paths(false), vec!["/etc/hosts", "/missing"]);
        assert_eq!(files.paths(true), vec!["/etc/hosts"]);
        assert!(files.for_pid(9).is_empty());
    }

    #[test]
    fn process_log_groups_in_first_seen_order() {
        let mut aggregates = Aggregates::new();
        for event in [record(20, "Command line"), record(10, "Command line"), record(20, "Status")] {
            aggregates.record(&event);
        }
        let groups: Vec<(i32, usize)> = aggregates.processes.groups().map(|(p, r)| (p, r.len())).collect();
        assert_eq!(groups, vec![(20, 2), (10, 1)]);
        assert_eq!(aggregates.processes.for_pid(20)[1].information, "Status");
    }

    #[test]
    fn summary_and_clear() {
        let mut aggregates = Aggregates::new();
        let events = [
            record(0, "Error"),
            record(5, "Command line"),
            call(5, "read"),
            call(5, "read"),
            call(6, "close"),
            file(5, "/tmp/a", true),
            file(5, "/tmp/b", false),
            TraceEvent::Ended(SessionOutcome::Completed { exit_code: Some(1) }),
        ];
        for event in &events {
            aggregates.emit(event).unwrap();
        }

        let summary = aggregates.summary(12, true, true);
        assert_eq!(summary.total_syscalls, 3);
        assert_eq!(summary.unique_syscalls, 2);
        assert_eq!(summary.process_count, 1);
        assert_eq!(summary.duration_ms, 12);
        assert_eq!(summary.outcome, SessionOutcome::Completed { exit_code: Some(1) });
        assert_eq!(summary.top_syscalls[0], ("read".to_string(), 2));
        assert_eq!(summary.files_accessed, vec!["/tmp/a"]);
        assert!(aggregates.summary(12, false, false).top_syscalls.len() > TOP_SYSCALLS);

        aggregates.clear();
        assert!(aggregates.activity.is_empty());
        assert!(aggregates.files.is_empty());
        assert_eq!(aggregates.processes.groups().count(), 0);
        assert_eq!(aggregates.counts.called().count(), 0);
        assert!(aggregates.outcome.is_none());
    }
}
