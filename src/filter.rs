use crate::catalog::{self, SyscallPrototype};
use serde::Serialize;
use std::collections::HashSet;

/// The set of syscall names a session reports. Membership is the only state;
/// every other view is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallFilter {
    selected: HashSet<String>,
}

/// One row of a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedSyscallEntry {
    pub name: String,
    pub checked: bool,
    pub return_type: String,
    pub arguments: String,
    pub has_path_argument: bool,
    pub is_socket_related: bool,
}

impl Default for SyscallFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl SyscallFilter {
    /// Every catalog syscall selected.
    pub fn all() -> Self {
        let mut filter = Self::none();
        filter.select_all();
        filter
    }

    pub fn none() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn should_report(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn select(&mut self, name: &str) {
        self.selected.insert(name.to_string());
    }

    pub fn deselect(&mut self, name: &str) {
        self.selected.remove(name);
    }

    pub fn select_all(&mut self) {
        for name in catalog::all_names() {
            self.select(name);
        }
    }

    /// Also drops names outside the catalog, such as `syscall_N`.
    pub fn deselect_all(&mut self) {
        let names: Vec<String> = self.selected.iter().cloned().collect();
        for name in &names {
            self.deselect(name);
        }
    }

    /// Select every catalog syscall whose prototype matches `predicate`.
    pub fn select_where<F>(&mut self, predicate: F)
    where
        F: Fn(&SyscallPrototype) -> bool,
    {
        for proto in catalog::prototypes().filter(|p| predicate(p)) {
            self.select(&proto.name);
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected names, sorted.
    pub fn selected_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.selected.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// One row per catalog syscall, sorted by name.
    pub fn entries(&self) -> Vec<SelectedSyscallEntry> {
        catalog::prototypes()
            .map(|proto| SelectedSyscallEntry {
                name: proto.name.clone(),
                checked: self.should_report(&proto.name),
                return_type: proto.return_type.clone(),
                arguments: proto.signature(),
                has_path_argument: proto.has_path_argument,
                is_socket_related: proto.is_socket_related,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_everything() {
        let filter = SyscallFilter::default();
        assert_eq!(filter.len(), catalog::all_names().len());
        assert!(filter.should_report("openat"));
        assert!(filter.should_report("getpid"));
    }

    #[test]
    fn select_then_deselect_restores_prior_result() {
        let mut filter = SyscallFilter::from_names(["open"]);
        for name in ["read", "not_a_syscall"] {
            assert!(!filter.should_report(name));
            filter.select(name);
            assert!(filter.should_report(name));
            filter.deselect(name);
            assert!(!filter.should_report(name));
        }
        filter.deselect("open");
        filter.select("open");
        assert!(filter.should_report("open"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn deselect_unknown_is_noop() {
        let mut filter = SyscallFilter::from_names(["open"]);
        filter.deselect("close");
        assert_eq!(filter.selected_names(), vec!["open"]);
    }

    #[test]
    fn select_where_adds_path_syscalls() {
        let mut filter = SyscallFilter::none();
        filter.select_where(|p| p.has_path_argument);
        assert!(filter.should_report("openat"));
        assert!(filter.should_report("unlink"));
        assert!(!filter.should_report("read"));
        assert!(!filter.should_report("connect"));
    }

    #[test]
    fn select_where_keeps_existing_selection() {
        let mut filter = SyscallFilter::from_names(["getpid"]);
        filter.select_where(|p| p.is_socket_related);
        assert!(filter.should_report("getpid"));
        assert!(filter.should_report("connect"));
        assert!(!filter.should_report("open"));
    }

    #[test]
    fn entries_mirror_selected_set() {
        let mut filter = SyscallFilter::none();
        filter.select("open");
        filter.select("socket");
        let entries = filter.entries();
        assert_eq!(entries.len(), catalog::all_names().len());

        let checked: Vec<&str> = entries
            .iter()
            .filter(|e| e.checked)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(checked, filter.selected_names());

        let open = entries.iter().find(|e| e.name == "open").unwrap();
        assert!(open.has_path_argument);
        assert_eq!(open.return_type, "long");
        assert_eq!(open.arguments, "const char *filename, int flags, umode_t mode");
    }

    #[test]
    fn deselect_all_empties() {
        let mut filter = SyscallFilter::all();
        filter.deselect_all();
        assert!(filter.is_empty());
        assert!(!filter.should_report("read"));
    }

    #[test]
    fn deselect_all_drops_names_outside_the_catalog() {
        let mut filter = SyscallFilter::from_names(["open", "syscall_999"]);
        filter.deselect_all();
        assert!(filter.is_empty());
        assert!(!filter.should_report("syscall_999"));
    }
}
