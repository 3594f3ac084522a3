use crate::catalog;
use crate::error::ConfigError;
use crate::filter::SyscallFilter;
use crate::tracer::decoder::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration loaded from ~/.sysscope/config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysscopeConfig {
    /// Syscalls reported by default. Absent means every known syscall.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_syscalls: Option<Vec<String>>,

    /// Removed from the selection after `selected_syscalls` is applied.
    pub ignored_syscalls: Vec<String>,

    pub show_ip: bool,
    pub string_max_length: usize,
    pub max_array_count: usize,

    /// Summary lists only syscalls that were called at least once.
    pub counts_only_called: bool,

    /// Summary lists only files that existed when they were observed.
    pub files_only_existing: bool,
}

impl Default for SysscopeConfig {
    fn default() -> Self {
        let decode = DecodeOptions::default();
        Self {
            selected_syscalls: None,
            ignored_syscalls: Vec::new(),
            show_ip: true,
            string_max_length: decode.string_max_length,
            max_array_count: decode.max_array_count,
            counts_only_called: true,
            files_only_existing: false,
        }
    }
}

impl SysscopeConfig {
    /// The initial filter: the selection (or everything) minus the ignore list.
    pub fn filter(&self) -> SyscallFilter {
        let mut filter = match &self.selected_syscalls {
            Some(names) => SyscallFilter::from_names(names.iter().cloned()),
            None => SyscallFilter::all(),
        };
        for name in &self.ignored_syscalls {
            filter.deselect(name);
        }

        let configured = self
            .selected_syscalls
            .iter()
            .flatten()
            .chain(&self.ignored_syscalls)
            .map(String::as_str);
        let unknown = catalog::unknown_names(configured);
        if !unknown.is_empty() {
            log::warn!("Unknown syscalls in config: {}", unknown.join(", "));
        }
        filter
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            string_max_length: self.string_max_length,
            max_array_count: self.max_array_count,
        }
    }
}

pub fn parse_config(content: &str) -> Result<SysscopeConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

pub fn read_config(path: &Path) -> Result<SysscopeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}

/// Load config from `path`, or ~/.sysscope/config.toml, falling back to
/// defaults. A missing default file is not worth a warning; anything else is.
pub fn load_config(path: Option<&Path>) -> SysscopeConfig {
    let explicit = path.is_some();
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(config_path);

    if !explicit && !config_path.exists() {
        log::debug!("No config at {}, using defaults", config_path.display());
        return SysscopeConfig::default();
    }

    match read_config(&config_path) {
        Ok(config) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            SysscopeConfig::default()
        }
    }
}

/// Returns the path to ~/.sysscope/config.toml
pub fn config_path() -> PathBuf {
    sysscope_dir().join("config.toml")
}

/// Returns the path to ~/.sysscope/
pub fn sysscope_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".sysscope")
}

/// Expand ~ to $HOME in a path string
pub fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.starts_with("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(format!("{}{}", home, &path_str[1..]));
        }
    }
    path.to_path_buf()
}

/// Generate the default config.toml content
pub fn default_config_toml() -> String {
    let config = SysscopeConfig::default();

    let mut toml = String::from("# sysscope configuration\n");
    toml.push_str(&format!("# Location: {}\n\n", config_path().display()));

    toml.push_str("# Syscalls reported by default. Leave unset to report every syscall.\n");
    toml.push_str("# selected_syscalls = [\"open\", \"openat\", \"execve\"]\n\n");

    toml.push_str("# Syscalls never reported, applied after selected_syscalls\n");
    toml.push_str("ignored_syscalls = []\n\n");

    toml.push_str("# Show the instruction pointer of each call\n");
    toml.push_str(&format!("show_ip = {}\n\n", config.show_ip));

    toml.push_str("# Strings and buffers longer than this are truncated\n");
    toml.push_str(&format!("string_max_length = {}\n\n", config.string_max_length));

    toml.push_str("# argv/envp entries shown before eliding the rest\n");
    toml.push_str(&format!("max_array_count = {}\n\n", config.max_array_count));

    toml.push_str("# Summary: list only syscalls called at least once\n");
    toml.push_str(&format!("counts_only_called = {}\n\n", config.counts_only_called));

    toml.push_str("# Summary: list only files that existed when observed\n");
    toml.push_str(&format!("files_only_existing = {}\n", config.files_only_existing));

    toml
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = SysscopeConfig::default();
        assert_eq!(config.selected_syscalls, None);
        assert!(config.show_ip);
        assert_eq!(config.string_max_length, 300);
        assert_eq!(config.max_array_count, 20);
        assert!(config.counts_only_called);
        assert!(!config.files_only_existing);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let parsed = parse_config(&default_config_toml()).unwrap();
        assert_eq!(parsed, SysscopeConfig::default());
    }

    #[test]
    fn test_partial_config_deserialize() {
        let config = parse_config("string_max_length = 32\nshow_ip = false\n").unwrap();
        assert_eq!(config.string_max_length, 32);
        assert!(!config.show_ip);
        assert_eq!(config.max_array_count, 20);
        assert_eq!(config.decode_options().string_max_length, 32);
    }

    #[test]
    fn test_filter_from_selection_and_ignores() {
        let config = parse_config(
            r#"
selected_syscalls = ["open", "read", "write"]
ignored_syscalls = ["write"]
"#,
        )
        .unwrap();
        let filter = config.filter();
        assert!(filter.should_report("open"));
        assert!(filter.should_report("read"));
        assert!(!filter.should_report("write"));
        assert!(!filter.should_report("close"));
    }

    #[test]
    fn test_unset_selection_means_all() {
        let config = parse_config("ignored_syscalls = [\"read\"]").unwrap();
        let filter = config.filter();
        assert!(filter.should_report("openat"));
        assert!(!filter.should_report("read"));
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "show_ip = \"yes please\"").unwrap();
        assert!(matches!(read_config(file.path()), Err(ConfigError::Parse(_))));
        assert_eq!(load_config(Some(file.path())), SysscopeConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(read_config(&missing), Err(ConfigError::FileRead { .. })));
        assert_eq!(load_config(Some(&missing)), SysscopeConfig::default());
    }

    #[test]
    fn test_loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "files_only_existing = true").unwrap();
        assert!(load_config(Some(file.path())).files_only_existing);
    }

    #[test]
    fn test_expand_tilde() {
        let home = std::env::var("HOME").unwrap_or_default();
        let result = expand_tilde(Path::new("~/.sysscope/config.toml"));
        if !home.is_empty() {
            assert_eq!(result, PathBuf::from(format!("{home}/.sysscope/config.toml")));
        }
        assert_eq!(expand_tilde(Path::new("/etc/x")), PathBuf::from("/etc/x"));
    }
}
