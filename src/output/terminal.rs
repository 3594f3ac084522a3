use std::io::{self, Write};

use colored::Colorize;

use crate::error::OutputError;
use crate::event::*;
use super::OutputSink;

/// Colored terminal output sink (writes to stderr).
pub struct TerminalSink {
    verbosity: u8,
    show_ip: bool,
}

impl TerminalSink {
    pub fn new(verbosity: u8, no_color: bool, show_ip: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { verbosity, show_ip }
    }

    fn format_syscall(&self, event: &DecodedSyscall) -> String {
        let ts = event.timestamp.format("%H:%M:%S%.3f");
        let pid = format!("[{}]", event.pid).dimmed().to_string();
        let ip = match event.instruction_pointer {
            Some(ip) if self.show_ip => format!(" {}", format!("@{ip:#x}").dimmed()),
            _ => String::new(),
        };

        let failed = event.result.is_some_and(|r| (-4095..0).contains(&r));
        let call = if failed {
            event.formatted.red().to_string()
        } else {
            event.formatted.cyan().to_string()
        };

        format!("{ts} {pid}{ip} {call}")
    }

    fn format_process(&self, event: &ProcessLifecycleRecord) -> String {
        let ts = event.timestamp.format("%H:%M:%S%.3f");
        let pid = format!("[{}]", event.pid).dimmed().to_string();

        let tag = match event.information.as_str() {
            "Error" => "ERROR".red().bold().to_string(),
            "Status" if event.value.starts_with("Process signal") => "PROC".yellow().bold().to_string(),
            _ => "PROC".blue().bold().to_string(),
        };
        let value = match event.information.as_str() {
            "Exit code" if event.value == "0" => event.value.green().to_string(),
            "Exit code" | "Killed by signal" | "Error" => event.value.red().to_string(),
            _ => event.value.clone(),
        };

        format!("{ts} {tag} {pid} {}: {value}", event.information)
    }

    fn format_file(&self, event: &FileObservation) -> String {
        let pid = format!("[{}]", event.pid).dimmed().to_string();
        let marker = if event.existing {
            "FILE".green().to_string()
        } else {
            "FILE".yellow().to_string()
        };
        format!("{marker} {pid} {}", event.path)
    }

    fn format_outcome(&self, outcome: &SessionOutcome) -> String {
        match outcome {
            SessionOutcome::Completed { exit_code: Some(code) } => {
                format!("{} exit code {code}", "Trace completed,".bold())
            }
            SessionOutcome::Completed { exit_code: None } => "Trace completed".bold().to_string(),
            SessionOutcome::Cancelled => "Trace cancelled".yellow().bold().to_string(),
            SessionOutcome::Failed { reason } => {
                format!("{} {reason}", "Trace failed:".red().bold())
            }
        }
    }

    fn format_summary(&self, summary: &TraceSummary) -> String {
        let mut lines = Vec::new();
        lines.push(format!("\n{}", "=== Trace Summary ===".bold()));
        lines.push(format!("Duration:        {}ms", summary.duration_ms));
        lines.push(format!("Total syscalls:  {}", summary.total_syscalls));
        lines.push(format!("Unique syscalls: {}", summary.unique_syscalls));
        lines.push(format!("Processes:       {}", summary.process_count));
        lines.push(format!("Outcome:         {}", self.format_outcome(&summary.outcome)));
        if !summary.top_syscalls.is_empty() {
            lines.push(format!("\n{}", "Top Syscalls:".bold()));
            for (name, count) in &summary.top_syscalls {
                lines.push(format!("  {count:>8}  {name}"));
            }
        }
        if !summary.files_accessed.is_empty() {
            lines.push(format!("\n{}", "Files:".bold()));
            for f in &summary.files_accessed {
                lines.push(format!("  -> {f}"));
            }
        }
        lines.join("\n")
    }

    fn render(&self, event: &TraceEvent) -> Option<String> {
        match event {
            TraceEvent::Syscall(e) if self.verbosity >= 1 => Some(self.format_syscall(e)),
            TraceEvent::File(e) if self.verbosity >= 2 => Some(self.format_file(e)),
            TraceEvent::Syscall(_) | TraceEvent::File(_) => None,
            TraceEvent::Process(e) => Some(self.format_process(e)),
            // The summary repeats the outcome.
            TraceEvent::Ended(_) => None,
            TraceEvent::Summary(s) => Some(self.format_summary(s)),
        }
    }
}

impl OutputSink for TerminalSink {
    fn emit(&mut self, event: &TraceEvent) -> Result<(), OutputError> {
        if let Some(line) = self.render(event) {
            writeln!(io::stderr(), "{line}")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        io::stderr().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn syscall(result: Option<i64>) -> TraceEvent {
        TraceEvent::Syscall(DecodedSyscall {
            timestamp: Utc::now(),
            elapsed_us: 10,
            pid: 99,
            syscall: "close".into(),
            syscall_nr: 3,
            formatted: "close(fd=3) = 0".into(),
            instruction_pointer: Some(0x7f00),
            arguments: Vec::new(),
            result,
        })
    }

    fn file() -> TraceEvent {
        TraceEvent::File(FileObservation {
            pid: 99,
            path: "/etc/passwd".into(),
            existing: true,
        })
    }

    #[test]
    fn verbosity_gates_syscalls_and_files() {
        let quiet = TerminalSink::new(0, true, false);
        assert!(quiet.render(&syscall(Some(0))).is_none());
        assert!(quiet.render(&file()).is_none());

        let normal = TerminalSink::new(1, true, false);
        let line = normal.render(&syscall(Some(0))).unwrap();
        assert!(line.contains("[99] close(fd=3) = 0"));
        assert!(normal.render(&file()).is_none());

        let chatty = TerminalSink::new(2, true, false);
        assert!(chatty.render(&file()).unwrap().contains("/etc/passwd"));
    }

    #[test]
    fn lifecycle_always_shown() {
        let sink = TerminalSink::new(0, true, false);
        let line = sink
            .render(&TraceEvent::Process(ProcessLifecycleRecord {
                pid: 5,
                timestamp: Utc::now(),
                elapsed_us: 0,
                information: "Exit code".into(),
                value: "0".into(),
            }))
            .unwrap();
        assert!(line.contains("[5] Exit code: 0"));
        assert!(sink.render(&TraceEvent::Ended(SessionOutcome::Cancelled)).is_none());
    }

    #[test]
    fn instruction_pointer_only_when_enabled() {
        let with_ip = TerminalSink::new(1, true, true);
        assert!(with_ip.render(&syscall(Some(0))).unwrap().contains("@0x7f00"));
        let without = TerminalSink::new(1, true, false);
        assert!(!without.render(&syscall(Some(0))).unwrap().contains("@0x7f00"));
    }

    #[test]
    fn summary_lists_top_calls() {
        let sink = TerminalSink::new(0, true, false);
        let text = sink
            .render(&TraceEvent::Summary(TraceSummary {
                timestamp: Utc::now(),
                total_syscalls: 12,
                unique_syscalls: 2,
                process_count: 1,
                duration_ms: 4,
                outcome: SessionOutcome::Completed { exit_code: Some(1) },
                top_syscalls: vec![("read".into(), 10), ("close".into(), 2)],
                files_accessed: vec!["/tmp/x".into()],
            }))
            .unwrap();
        assert!(text.contains("Total syscalls:  12"));
        assert!(text.contains("exit code 1"));
        assert!(text.contains("read"));
        assert!(text.contains("-> /tmp/x"));
    }
}
