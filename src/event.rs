use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display text used for a string argument whose memory could not be read.
pub const NO_STRING: &str = "<unavailable>";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TraceEvent {
    Syscall(DecodedSyscall),
    Process(ProcessLifecycleRecord),
    File(FileObservation),
    Ended(SessionOutcome),
    Summary(TraceSummary),
}

/// One complete syscall, entry and exit combined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedSyscall {
    pub timestamp: DateTime<Utc>,
    pub elapsed_us: u64,
    pub pid: i32,
    pub syscall: String,
    pub syscall_nr: u64,
    pub formatted: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instruction_pointer: Option<u64>,
    pub arguments: Vec<DecodedArgument>,
    /// `None` when the process exited before the call returned.
    pub result: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedArgument {
    pub name: String,
    pub type_name: String,
    pub raw: u64,
    pub text: String,
    pub is_path: bool,
    /// Contents of a string argument when it could be read from the tracee.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub string: Option<String>,
}

impl DecodedArgument {
    /// The filesystem path carried by this argument, if it is a path argument
    /// that decoded to a usable value.
    pub fn path(&self) -> Option<&str> {
        if !self.is_path || self.text.is_empty() || self.text == NO_STRING {
            return None;
        }
        self.string.as_deref().filter(|s| !s.is_empty())
    }
}

/// One discrete fact about a traced process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLifecycleRecord {
    pub pid: i32,
    pub timestamp: DateTime<Utc>,
    pub elapsed_us: u64,
    pub information: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileObservation {
    pub pid: i32,
    pub path: String,
    pub existing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every traced process exited. `exit_code` belongs to the launched program.
    Completed { exit_code: Option<i32> },
    Cancelled,
    Failed { reason: String },
}

impl SessionOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::Completed { exit_code } => exit_code.unwrap_or(0),
            SessionOutcome::Cancelled => 130,
            SessionOutcome::Failed { .. } => 127,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub timestamp: DateTime<Utc>,
    pub total_syscalls: u64,
    pub unique_syscalls: u64,
    pub process_count: u64,
    pub duration_ms: u64,
    pub outcome: SessionOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub top_syscalls: Vec<(String, u64)>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files_accessed: Vec<String>,
}

impl TraceEvent {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            TraceEvent::Syscall(e) => Some(e.timestamp),
            TraceEvent::Process(e) => Some(e.timestamp),
            TraceEvent::Summary(e) => Some(e.timestamp),
            TraceEvent::File(_) | TraceEvent::Ended(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_arg(text: &str, string: Option<&str>) -> DecodedArgument {
        DecodedArgument {
            name: "filename".into(),
            type_name: "const char *".into(),
            raw: 0x1000,
            text: text.into(),
            is_path: true,
            string: string.map(String::from),
        }
    }

    #[test]
    fn path_requires_readable_string() {
        assert_eq!(path_arg("'/tmp/x'", Some("/tmp/x")).path(), Some("/tmp/x"));
        assert_eq!(path_arg(NO_STRING, None).path(), None);
        assert_eq!(path_arg("''", Some("")).path(), None);
    }

    #[test]
    fn non_path_argument_has_no_path() {
        let mut arg = path_arg("'x'", Some("x"));
        arg.is_path = false;
        assert_eq!(arg.path(), None);
    }

    #[test]
    fn events_are_tagged() {
        let event = TraceEvent::Ended(SessionOutcome::Cancelled);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "ended");
        assert_eq!(json["kind"], "cancelled");
    }

    #[test]
    fn outcome_exit_codes() {
        assert_eq!(SessionOutcome::Completed { exit_code: Some(3) }.exit_code(), 3);
        assert_eq!(SessionOutcome::Completed { exit_code: None }.exit_code(), 0);
        assert_eq!(SessionOutcome::Cancelled.exit_code(), 130);
    }
}
