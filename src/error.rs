use nix::errno::Errno;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SysscopeError {
    #[error("Tracer error: {0}")]
    Tracer(#[from] TracerError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Error, Debug)]
pub enum TracerError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Ptrace error: {0}")]
    Ptrace(#[source] nix::Error),

    #[error("Wait failed: {0}")]
    Wait(#[source] nix::Error),

    #[error("Memory read failed at {addr:#x}: {source}")]
    MemoryRead {
        addr: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Architecture not supported: {0}")]
    UnsupportedArch(String),

    #[error("Process {0} not found in process table")]
    ProcessNotFound(i32),

    #[error("Failed to start tracer thread: {0}")]
    Thread(#[source] std::io::Error),
}

impl TracerError {
    /// The tracee vanished between the wait and the ptrace request. Expected
    /// while processes exit or while a session is being cancelled.
    pub fn is_benign(&self) -> bool {
        matches!(self, TracerError::Ptrace(Errno::ESRCH))
    }

    /// Per-event failures that are logged while the dispatch loop keeps going.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TracerError::ProcessNotFound(_) | TracerError::MemoryRead { .. } => true,
            TracerError::Wait(errno) => *errno == Errno::EINTR,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SysscopeError>;

pub type TraceResult<T> = std::result::Result<T, TracerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn esrch_is_benign() {
        assert!(TracerError::Ptrace(Errno::ESRCH).is_benign());
        assert!(!TracerError::Ptrace(Errno::EPERM).is_benign());
        assert!(!TracerError::Wait(Errno::ESRCH).is_benign());
    }

    #[test]
    fn missing_process_is_recoverable() {
        assert!(TracerError::ProcessNotFound(42).is_recoverable());
        assert!(TracerError::Wait(Errno::EINTR).is_recoverable());
        assert!(!TracerError::Wait(Errno::EINVAL).is_recoverable());
        assert!(!TracerError::UnsupportedArch("mips".into()).is_recoverable());
    }
}
