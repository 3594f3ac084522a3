use nix::unistd::{Gid, Group, Uid, User};
use procfs::process::FDTarget;
use std::path::PathBuf;

/// Identity and environment of a process, read from `/proc` right after it
/// executed a new image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDetails {
    pub pid: i32,
    pub ppid: i32,
    pub command_line: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub user: UserIdentity,
    pub effective_user: UserIdentity,
    pub group: GroupIdentity,
    pub effective_group: GroupIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: u32,
    pub name: Option<String>,
    pub real_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIdentity {
    pub id: u32,
    pub name: Option<String>,
}

impl ProcessDetails {
    /// `(label, value)` pairs in display order. `parent` is the tracked
    /// parent, not the kernel's ppid, since the root's ppid is the tracer.
    pub fn facts(&self, parent: Option<i32>) -> Vec<(&'static str, String)> {
        let mut facts = vec![("Command line", self.command_line.join(" "))];
        if let Some(cwd) = &self.cwd {
            facts.push(("Current working directory", cwd.display().to_string()));
        }
        if let Some(parent) = parent {
            facts.push(("Parent PID", parent.to_string()));
        }

        push_user(&mut facts, &self.user, ["User ID", "User name", "User real name"]);
        push_user(
            &mut facts,
            &self.effective_user,
            ["Effective user ID", "Effective user name", "Effective user real name"],
        );
        push_group(&mut facts, &self.group, ["Group ID", "Group name"]);
        push_group(&mut facts, &self.effective_group, ["Effective group ID", "Effective group name"]);
        facts
    }
}

fn push_user(facts: &mut Vec<(&'static str, String)>, user: &UserIdentity, labels: [&'static str; 3]) {
    facts.push((labels[0], user.id.to_string()));
    if let Some(name) = &user.name {
        facts.push((labels[1], name.clone()));
    }
    if let Some(real_name) = &user.real_name {
        facts.push((labels[2], real_name.clone()));
    }
}

fn push_group(facts: &mut Vec<(&'static str, String)>, group: &GroupIdentity, labels: [&'static str; 2]) {
    facts.push((labels[0], group.id.to_string()));
    if let Some(name) = &group.name {
        facts.push((labels[1], name.clone()));
    }
}

pub fn read_process_details(pid: i32) -> Option<ProcessDetails> {
    let proc = procfs::process::Process::new(pid).ok()?;
    let status = proc.status().ok()?;
    let command_line = proc.cmdline().unwrap_or_default();
    let cwd = proc.cwd().ok();

    Some(ProcessDetails {
        pid,
        ppid: status.ppid,
        command_line,
        cwd,
        user: lookup_user(status.ruid),
        effective_user: lookup_user(status.euid),
        group: lookup_group(status.rgid),
        effective_group: lookup_group(status.egid),
    })
}

pub fn current_dir(pid: i32) -> Option<PathBuf> {
    procfs::process::Process::new(pid).ok()?.cwd().ok()
}

pub fn fd_path(pid: i32, fd: i32) -> Option<PathBuf> {
    let info = procfs::process::Process::new(pid).ok()?.fd_from_fd(fd).ok()?;
    match info.target {
        FDTarget::Path(path) => Some(path),
        _ => None,
    }
}

pub fn lookup_user(uid: u32) -> UserIdentity {
    let user = User::from_uid(Uid::from_raw(uid)).ok().flatten();
    let real_name = user.as_ref().and_then(|u| {
        let gecos = u.gecos.to_string_lossy();
        let full = gecos.split(',').next().unwrap_or_default().trim().to_string();
        (!full.is_empty()).then_some(full)
    });
    UserIdentity {
        id: uid,
        name: user.map(|u| u.name),
        real_name,
    }
}

pub fn lookup_group(gid: u32) -> GroupIdentity {
    GroupIdentity {
        id: gid,
        name: Group::from_gid(Gid::from_raw(gid)).ok().flatten().map(|g| g.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_own_details() {
        let pid = std::process::id() as i32;
        let details = read_process_details(pid).unwrap();
        assert_eq!(details.pid, pid);
        assert!(!details.command_line.is_empty());
        assert_eq!(details.cwd, std::env::current_dir().ok());
        assert_eq!(details.user.id, nix::unistd::getuid().as_raw());
        assert_eq!(details.effective_group.id, nix::unistd::getegid().as_raw());
    }

    #[test]
    fn resolves_directory_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let handle = std::fs::File::open(dir.path()).unwrap();
        let fd = std::os::fd::AsRawFd::as_raw_fd(&handle);
        let resolved = fd_path(std::process::id() as i32, fd).unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn root_user_resolves() {
        let root = lookup_user(0);
        assert_eq!(root.id, 0);
        assert_eq!(root.name.as_deref(), Some("root"));
        assert_eq!(lookup_group(0).name.as_deref(), Some("root"));
    }

    #[test]
    fn unknown_ids_keep_numbers() {
        let nobody = lookup_user(4_000_000_000);
        assert_eq!(nobody.id, 4_000_000_000);
        assert_eq!(nobody.name, None);
        assert_eq!(nobody.real_name, None);
    }

    #[test]
    fn facts_are_ordered_and_skip_missing_names() {
        let details = ProcessDetails {
            pid: 42,
            ppid: 1,
            command_line: vec!["/bin/ls".into(), "-l".into()],
            cwd: Some(PathBuf::from("/tmp")),
            user: UserIdentity {
                id: 1000,
                name: Some("alice".into()),
                real_name: None,
            },
            effective_user: UserIdentity {
                id: 1000,
                name: Some("alice".into()),
                real_name: Some("Alice".into()),
            },
            group: GroupIdentity { id: 1000, name: None },
            effective_group: GroupIdentity {
                id: 1000,
                name: Some("users".into()),
            },
        };

        let labels: Vec<&str> = details.facts(Some(7)).iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "Command line",
                "Current working directory",
                "Parent PID",
                "User ID",
                "User name",
                "Effective user ID",
                "Effective user name",
                "Effective user real name",
                "Group ID",
                "Effective group ID",
                "Effective group name",
            ]
        );
        let facts = details.facts(None);
        assert_eq!(facts[0], ("Command line", "/bin/ls -l".to_string()));
        assert!(facts.iter().all(|(l, _)| *l != "Parent PID"));
    }
}
