//! Static syscall catalog: prototypes keyed by name plus the two derived
//! classifications used for bulk selection.

mod prototypes;

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// Argument names that carry a filesystem path.
const FILENAME_ARGUMENTS: &[&str] = &[
    "filename",
    "pathname",
    "oldname",
    "newname",
    "path",
    "linkpath",
    "specialfile",
    "new_root",
    "put_old",
    "from_pathname",
    "to_pathname",
];

const SOCKET_SYSCALL_NAMES: &[&str] = &[
    "socket",
    "socketpair",
    "connect",
    "bind",
    "listen",
    "accept",
    "accept4",
    "getsockname",
    "getpeername",
    "setsockopt",
    "getsockopt",
    "sendto",
    "recvfrom",
    "sendmsg",
    "recvmsg",
    "sendmmsg",
    "recvmmsg",
    "shutdown",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSpec {
    pub type_name: String,
    pub name: String,
}

impl ArgumentSpec {
    pub fn is_path(&self) -> bool {
        FILENAME_ARGUMENTS.contains(&self.name.as_str())
    }

    pub fn is_pointer(&self) -> bool {
        self.type_name.contains('*')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyscallPrototype {
    pub name: String,
    pub return_type: String,
    pub arguments: Vec<ArgumentSpec>,
    pub has_path_argument: bool,
    pub is_socket_related: bool,
}

impl SyscallPrototype {
    pub fn is_empty(&self) -> bool {
        self.return_type.is_empty() && self.arguments.is_empty()
    }

    /// `type name, type name` as shown in selection lists.
    pub fn signature(&self) -> String {
        self.arguments
            .iter()
            .map(|a| format_argument(&a.type_name, &a.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn returns_pointer(&self) -> bool {
        self.return_type.contains('*')
    }
}

fn format_argument(type_name: &str, name: &str) -> String {
    if type_name.ends_with('*') {
        format!("{type_name}{name}")
    } else {
        format!("{type_name} {name}")
    }
}

static CATALOG: LazyLock<BTreeMap<String, SyscallPrototype>> = LazyLock::new(|| {
    prototypes::PROTOTYPES
        .lines()
        .filter_map(parse_prototype)
        .map(|proto| (proto.name.clone(), proto))
        .collect()
});

static EMPTY: SyscallPrototype = SyscallPrototype {
    name: String::new(),
    return_type: String::new(),
    arguments: Vec::new(),
    has_path_argument: false,
    is_socket_related: false,
};

/// Parse one `name: return_type (type arg, ...)` line.
fn parse_prototype(line: &str) -> Option<SyscallPrototype> {
    let line = line.trim();
    let (name, rest) = line.split_once(':')?;
    let open = rest.find('(')?;
    let close = rest.rfind(')')?;
    let return_type = rest[..open].trim().to_string();

    let arguments = rest[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(parse_argument)
        .collect::<Vec<_>>();

    let name = name.trim().to_string();
    let (has_path_argument, is_socket_related) = derive_classes(&name, &arguments);

    Some(SyscallPrototype {
        name,
        return_type,
        arguments,
        has_path_argument,
        is_socket_related,
    })
}

/// Split `const char *const *argv` into its type and its name.
fn parse_argument(decl: &str) -> Option<ArgumentSpec> {
    let split = decl.rfind(|c: char| c == ' ' || c == '*')?;
    let (type_name, name) = decl.split_at(split + 1);
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(ArgumentSpec {
        type_name: type_name.trim_end().to_string(),
        name: name.to_string(),
    })
}

fn derive_classes(name: &str, arguments: &[ArgumentSpec]) -> (bool, bool) {
    let has_path = arguments.iter().any(ArgumentSpec::is_path);
    let is_socket = SOCKET_SYSCALL_NAMES.contains(&name);
    (has_path, is_socket)
}

/// Prototype for `name`, or the empty prototype when the name is unknown.
pub fn lookup(name: &str) -> &'static SyscallPrototype {
    CATALOG.get(name).unwrap_or(&EMPTY)
}

pub fn contains(name: &str) -> bool {
    CATALOG.contains_key(name)
}

/// Every known syscall name, sorted and without duplicates.
pub fn all_names() -> Vec<&'static str> {
    CATALOG.keys().map(String::as_str).collect()
}

pub fn prototypes() -> impl Iterator<Item = &'static SyscallPrototype> {
    CATALOG.values()
}

/// `(has_path_argument, is_socket_related)` for `name`.
pub fn classify(name: &str) -> (bool, bool) {
    let proto = lookup(name);
    (proto.has_path_argument, proto.is_socket_related)
}

/// Names that are absent from the catalog, in input order.
pub fn unknown_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|n| !contains(n) && seen.insert(*n))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::arch::{aarch64, x86_64};

    #[test]
    fn parses_pointer_arguments() {
        let execve = lookup("execve");
        assert_eq!(execve.return_type, "int");
        assert_eq!(execve.arguments.len(), 3);
        assert_eq!(execve.arguments[0].type_name, "const char *");
        assert_eq!(execve.arguments[0].name, "filename");
        assert_eq!(execve.arguments[1].type_name, "const char *const *");
        assert_eq!(execve.arguments[1].name, "argv");
        assert!(execve.has_path_argument);
        assert!(!execve.is_socket_related);
    }

    #[test]
    fn unknown_name_yields_empty_prototype() {
        let proto = lookup("definitely_not_a_syscall");
        assert!(proto.is_empty());
        assert_eq!(proto.signature(), "");
        assert_eq!(classify("definitely_not_a_syscall"), (false, false));
    }

    #[test]
    fn no_argument_calls_are_not_empty() {
        let getpid = lookup("getpid");
        assert!(!getpid.is_empty());
        assert!(getpid.arguments.is_empty());
        assert_eq!(getpid.return_type, "pid_t");
    }

    #[test]
    fn all_names_are_sorted_and_resolvable() {
        let names = all_names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        for name in names {
            assert!(!lookup(name).is_empty(), "{name} resolves to the empty prototype");
        }
    }

    #[test]
    fn every_table_entry_has_a_prototype() {
        for (nr, name) in x86_64::SYSCALLS.iter().chain(aarch64::SYSCALLS) {
            assert!(contains(name), "syscall {nr} ({name}) has no prototype");
        }
    }

    #[test]
    fn classifications() {
        assert_eq!(classify("open"), (true, false));
        assert_eq!(classify("renameat2"), (true, false));
        assert_eq!(classify("connect"), (false, true));
        assert_eq!(classify("read"), (false, false));
        assert_eq!(classify("fspick"), (true, false));
    }

    #[test]
    fn signature_formatting() {
        assert_eq!(
            lookup("openat").signature(),
            "int dfd, const char *filename, int flags, umode_t mode"
        );
        assert_eq!(lookup("getpid").signature(), "");
    }

    #[test]
    fn unknown_names_are_reported_once() {
        let unknown = unknown_names(["open", "bogus", "read", "bogus"]);
        assert_eq!(unknown, vec!["bogus".to_string()]);
    }
}
