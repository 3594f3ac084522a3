use super::memory::MemoryReader;
use crate::catalog::{self, ArgumentSpec, SyscallPrototype};
use crate::event::{DecodedArgument, NO_STRING};
use nix::errno::Errno;
use nix::unistd::Pid;

/// Syscalls whose output buffer is only meaningful after the call returns:
/// `(name, buffer argument index)`. The return value is the byte count.
const READ_BUFFERS: &[(&str, usize)] = &[
    ("read", 1),
    ("pread64", 1),
    ("recvfrom", 1),
    ("getcwd", 0),
    ("readlink", 1),
    ("readlinkat", 2),
];

/// Syscalls whose input buffer is shown at entry:
/// `(name, buffer argument index, length argument index)`.
const WRITE_BUFFERS: &[(&str, usize, usize)] = &[
    ("write", 1, 2),
    ("pwrite64", 1, 2),
    ("sendto", 1, 2),
    ("mq_timedsend", 1, 2),
];

/// Calls that take a socket address as input: `(name, addr index, len index)`.
const SOCKADDR_INPUTS: &[(&str, usize, usize)] = &[
    ("connect", 1, 2),
    ("bind", 1, 2),
    ("sendto", 4, 5),
];

pub(crate) const DIRFD_NAMES: &[&str] = &["dfd", "olddfd", "newdfd", "from_dfd", "to_dfd", "mountdirfd"];

const UNSIGNED_TYPES: &[&str] = &[
    "unsigned int",
    "unsigned long",
    "size_t",
    "u32",
    "u64",
    "uid_t",
    "gid_t",
    "qid_t",
    "rwf_t",
    "aio_context_t",
    "umode_t",
    "mode_t",
];

const INT_TYPES: &[&str] = &["int", "pid_t", "key_t", "clockid_t", "mqd_t", "s32", "key_serial_t"];

#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub string_max_length: usize,
    pub max_array_count: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            string_max_length: 300,
            max_array_count: 20,
        }
    }
}

/// Turns raw syscall registers into display arguments and formatted calls.
#[derive(Debug, Clone, Default)]
pub struct SyscallDecoder {
    options: DecodeOptions,
}

impl SyscallDecoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decode every argument the prototype names, reading strings, arrays and
    /// input buffers from tracee memory. Unknown syscalls get raw `argN` values.
    pub fn decode_entry(
        &self,
        mem: &dyn MemoryReader,
        pid: Pid,
        name: &str,
        args: &[u64; 6],
    ) -> Vec<DecodedArgument> {
        let proto = catalog::lookup(name);
        if proto.is_empty() {
            return raw_arguments(args);
        }

        proto
            .arguments
            .iter()
            .take(args.len())
            .enumerate()
            .map(|(idx, spec)| self.decode_argument(mem, pid, name, idx, spec, args))
            .collect()
    }

    /// Fill in output buffers that only hold data once the call has returned.
    pub fn decode_exit(
        &self,
        mem: &dyn MemoryReader,
        pid: Pid,
        name: &str,
        arguments: &mut [DecodedArgument],
        result: i64,
    ) {
        let Some(&(_, idx)) = READ_BUFFERS.iter().find(|(n, _)| *n == name) else {
            return;
        };
        if result <= 0 {
            return;
        }
        if let Some(arg) = arguments.get_mut(idx) {
            if arg.raw != 0 {
                arg.text = self.buffer(mem, pid, arg.raw, result as usize);
            }
        }
    }

    fn decode_argument(
        &self,
        mem: &dyn MemoryReader,
        pid: Pid,
        name: &str,
        idx: usize,
        spec: &ArgumentSpec,
        args: &[u64; 6],
    ) -> DecodedArgument {
        let raw = args[idx];
        let mut decoded = DecodedArgument {
            name: spec.name.clone(),
            type_name: spec.type_name.clone(),
            raw,
            text: String::new(),
            is_path: spec.is_path(),
            string: None,
        };

        if spec.is_pointer() && raw == 0 {
            decoded.text = "NULL".to_string();
            return decoded;
        }

        if let Some(&(_, _, len_idx)) = WRITE_BUFFERS.iter().find(|(n, i, _)| *n == name && *i == idx) {
            decoded.text = self.buffer(mem, pid, raw, args[len_idx] as usize);
            return decoded;
        }

        if let Some(&(_, _, len_idx)) = SOCKADDR_INPUTS.iter().find(|(n, i, _)| *n == name && *i == idx) {
            decoded.text = decode_sockaddr(mem, pid, raw, args[len_idx] as usize);
            return decoded;
        }

        decoded.text = match spec.type_name.as_str() {
            "const char *" | "char *" if decoded.is_path || is_string_argument(name, spec) => {
                match self.string(mem, pid, raw) {
                    Some((value, text)) => {
                        decoded.string = Some(value);
                        text
                    }
                    None => NO_STRING.to_string(),
                }
            }
            "const char *const *" => self.string_array(mem, pid, raw),
            _ => self.scalar(name, spec, raw),
        };
        decoded
    }

    fn scalar(&self, name: &str, spec: &ArgumentSpec, raw: u64) -> String {
        let arg = spec.name.as_str();
        match (name, arg) {
            ("open" | "openat" | "mq_open", "flags" | "oflag") => return decode_open_flags(raw),
            ("mmap" | "mprotect" | "pkey_mprotect", "prot") => return decode_mmap_prot(raw),
            ("mmap", "flags") => return decode_mmap_flags(raw),
            ("access" | "faccessat" | "faccessat2", "mode") => return decode_access_mode(raw),
            ("socket" | "socketpair", "family") => return decode_socket_domain(raw),
            ("socket" | "socketpair", "type") => return decode_socket_type(raw),
            _ => {}
        }

        if DIRFD_NAMES.contains(&arg) || (name == "execveat" && arg == "fd") {
            return dirfd_to_string(raw);
        }

        let type_name = spec.type_name.as_str();
        if spec.is_pointer() {
            format!("{raw:#x}")
        } else if type_name == "umode_t" || type_name == "mode_t" {
            format_mode(raw)
        } else if INT_TYPES.contains(&type_name) {
            (raw as i32).to_string()
        } else if type_name == "unsigned int" || type_name == "u32" {
            (raw as u32).to_string()
        } else if UNSIGNED_TYPES.contains(&type_name) {
            raw.to_string()
        } else {
            (raw as i64).to_string()
        }
    }

    /// `(contents, quoted display text)` for a C string argument.
    fn string(&self, mem: &dyn MemoryReader, pid: Pid, addr: u64) -> Option<(String, String)> {
        match mem.read_c_string(pid, addr, self.options.string_max_length) {
            Ok((bytes, truncated)) => {
                let value = String::from_utf8_lossy(&bytes).into_owned();
                Some((value, quote(&bytes, truncated)))
            }
            Err(e) => {
                log::debug!("pid {}: string at {:#x} unreadable: {}", pid, addr, e);
                None
            }
        }
    }

    fn string_array(&self, mem: &dyn MemoryReader, pid: Pid, addr: u64) -> String {
        let mut items = Vec::new();
        let mut more = false;

        for i in 0u64.. {
            let Ok(ptr) = mem.read_word(pid, addr + i * 8) else {
                break;
            };
            if ptr == 0 {
                break;
            }
            if items.len() == self.options.max_array_count {
                more = true;
                break;
            }
            items.push(match self.string(mem, pid, ptr) {
                Some((_, text)) => text,
                None => NO_STRING.to_string(),
            });
        }

        if more {
            items.push("...".to_string());
        }
        format!("[{}]", items.join(", "))
    }

    fn buffer(&self, mem: &dyn MemoryReader, pid: Pid, addr: u64, len: usize) -> String {
        let shown = len.min(self.options.string_max_length);
        match mem.read_bytes(pid, addr, shown) {
            Ok(bytes) => quote(&bytes, len > bytes.len()),
            Err(_) => format!("{addr:#x}"),
        }
    }

    /// `name(arg=value, ...) = result`
    pub fn format_call(&self, name: &str, arguments: &[DecodedArgument], result: Option<i64>) -> String {
        let args = arguments
            .iter()
            .map(|a| format!("{}={}", a.name, a.text))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}) = {}", name, args, format_result(catalog::lookup(name), result))
    }
}

fn is_string_argument(name: &str, spec: &ArgumentSpec) -> bool {
    // Plain `char *` arguments are mostly output buffers; only a few name strings.
    spec.type_name.starts_with("const") || matches!((name, spec.name.as_str()), ("mount", _) | ("umount2", "name"))
}

fn raw_arguments(args: &[u64; 6]) -> Vec<DecodedArgument> {
    args.iter()
        .enumerate()
        .map(|(i, &raw)| DecodedArgument {
            name: format!("arg{i}"),
            type_name: String::new(),
            raw,
            text: format!("{raw:#x}"),
            is_path: false,
            string: None,
        })
        .collect()
}

pub fn format_result(proto: &SyscallPrototype, result: Option<i64>) -> String {
    let Some(value) = result else {
        return "?".to_string();
    };

    if let Some((name, desc)) = kernel_restart_errno(-value) {
        return format!("? {name} ({desc})");
    }

    if (-4095..=-1).contains(&value) {
        let errno = Errno::from_raw((-value) as i32);
        return match errno {
            Errno::UnknownErrno => format!("-1 (errno {})", -value),
            e => format!("-1 {:?} ({})", e, e.desc()),
        };
    }

    if proto.returns_pointer() {
        format!("{value:#x}")
    } else {
        value.to_string()
    }
}

/// Kernel-internal errnos a tracer sees at syscall exit when a signal
/// interrupted the call. The tracee itself never observes them.
fn kernel_restart_errno(errno: i64) -> Option<(&'static str, &'static str)> {
    match errno {
        512 => Some(("ERESTARTSYS", "To be restarted if SA_RESTART is set")),
        513 => Some(("ERESTARTNOINTR", "To be restarted")),
        514 => Some(("ERESTARTNOHAND", "To be restarted if no handler")),
        515 => Some(("ENOIOCTLCMD", "No ioctl command")),
        516 => Some(("ERESTART_RESTARTBLOCK", "Interrupted by signal")),
        _ => None,
    }
}

/// Quote bytes for display, escaping anything non-printable.
pub fn quote(bytes: &[u8], truncated: bool) -> String {
    let mut out = String::with_capacity(bytes.len() + 5);
    out.push('\'');
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push('\'');
    if truncated {
        out.push_str("...");
    }
    out
}

fn dirfd_to_string(dirfd: u64) -> String {
    if dirfd as i32 == libc::AT_FDCWD {
        "AT_FDCWD".to_string()
    } else {
        (dirfd as i32).to_string()
    }
}

fn format_mode(mode: u64) -> String {
    if mode == 0 {
        "0".to_string()
    } else {
        format!("0{mode:o}")
    }
}

fn join_or(parts: Vec<&str>, raw: u64) -> String {
    if parts.is_empty() {
        format!("{raw:#x}")
    } else {
        parts.join("|")
    }
}

fn decode_open_flags(flags: u64) -> String {
    let mut parts = Vec::new();

    match flags & libc::O_ACCMODE as u64 {
        0 => parts.push("O_RDONLY"),
        1 => parts.push("O_WRONLY"),
        2 => parts.push("O_RDWR"),
        _ => parts.push("O_ACCMODE"),
    }

    let named = [
        (libc::O_CREAT, "O_CREAT"),
        (libc::O_EXCL, "O_EXCL"),
        (libc::O_NOCTTY, "O_NOCTTY"),
        (libc::O_TRUNC, "O_TRUNC"),
        (libc::O_APPEND, "O_APPEND"),
        (libc::O_NONBLOCK, "O_NONBLOCK"),
        (libc::O_DIRECTORY, "O_DIRECTORY"),
        (libc::O_NOFOLLOW, "O_NOFOLLOW"),
        (libc::O_CLOEXEC, "O_CLOEXEC"),
    ];
    for (bit, label) in named {
        if flags & bit as u64 != 0 {
            parts.push(label);
        }
    }

    parts.join("|")
}

fn decode_mmap_prot(prot: u64) -> String {
    if prot == 0 {
        return "PROT_NONE".to_string();
    }
    let mut parts = Vec::new();
    if prot & libc::PROT_READ as u64 != 0 {
        parts.push("PROT_READ");
    }
    if prot & libc::PROT_WRITE as u64 != 0 {
        parts.push("PROT_WRITE");
    }
    if prot & libc::PROT_EXEC as u64 != 0 {
        parts.push("PROT_EXEC");
    }
    join_or(parts, prot)
}

fn decode_mmap_flags(flags: u64) -> String {
    let mut parts = Vec::new();

    match flags & 0x3 {
        x if x == libc::MAP_SHARED as u64 => parts.push("MAP_SHARED"),
        x if x == libc::MAP_PRIVATE as u64 => parts.push("MAP_PRIVATE"),
        x if x == libc::MAP_SHARED_VALIDATE as u64 => parts.push("MAP_SHARED_VALIDATE"),
        _ => {}
    }

    let named = [
        (libc::MAP_FIXED, "MAP_FIXED"),
        (libc::MAP_ANONYMOUS, "MAP_ANONYMOUS"),
        (libc::MAP_DENYWRITE, "MAP_DENYWRITE"),
        (libc::MAP_NORESERVE, "MAP_NORESERVE"),
        (libc::MAP_POPULATE, "MAP_POPULATE"),
        (libc::MAP_STACK, "MAP_STACK"),
    ];
    for (bit, label) in named {
        if flags & bit as u64 != 0 {
            parts.push(label);
        }
    }

    join_or(parts, flags)
}

fn decode_access_mode(mode: u64) -> String {
    if mode == libc::F_OK as u64 {
        return "F_OK".to_string();
    }
    let mut parts = Vec::new();
    if mode & libc::R_OK as u64 != 0 {
        parts.push("R_OK");
    }
    if mode & libc::W_OK as u64 != 0 {
        parts.push("W_OK");
    }
    if mode & libc::X_OK as u64 != 0 {
        parts.push("X_OK");
    }
    join_or(parts, mode)
}

fn decode_socket_domain(domain: u64) -> String {
    match domain as i32 {
        libc::AF_UNIX => "AF_UNIX".to_string(),
        libc::AF_INET => "AF_INET".to_string(),
        libc::AF_INET6 => "AF_INET6".to_string(),
        libc::AF_NETLINK => "AF_NETLINK".to_string(),
        libc::AF_PACKET => "AF_PACKET".to_string(),
        other => other.to_string(),
    }
}

fn decode_socket_type(ty: u64) -> String {
    let mut parts = Vec::new();

    match (ty & 0xf) as i32 {
        libc::SOCK_STREAM => parts.push("SOCK_STREAM".to_string()),
        libc::SOCK_DGRAM => parts.push("SOCK_DGRAM".to_string()),
        libc::SOCK_SEQPACKET => parts.push("SOCK_SEQPACKET".to_string()),
        libc::SOCK_RAW => parts.push("SOCK_RAW".to_string()),
        libc::SOCK_RDM => parts.push("SOCK_RDM".to_string()),
        10 => parts.push("SOCK_PACKET".to_string()),
        other => parts.push(other.to_string()),
    }

    if ty & libc::SOCK_NONBLOCK as u64 != 0 {
        parts.push("SOCK_NONBLOCK".to_string());
    }
    if ty & libc::SOCK_CLOEXEC as u64 != 0 {
        parts.push("SOCK_CLOEXEC".to_string());
    }

    parts.join("|")
}

fn decode_sockaddr(mem: &dyn MemoryReader, pid: Pid, addr: u64, len: usize) -> String {
    let data = match mem.read_bytes(pid, addr, len.min(128)) {
        Ok(data) if data.len() >= 2 => data,
        _ => return format!("{addr:#x}"),
    };

    let family = u16::from_ne_bytes([data[0], data[1]]) as i32;

    match family {
        libc::AF_INET if data.len() >= 8 => {
            let port = u16::from_be_bytes([data[2], data[3]]);
            let ip = std::net::Ipv4Addr::new(data[4], data[5], data[6], data[7]);
            format!("{{AF_INET, {ip}:{port}}}")
        }
        libc::AF_INET6 if data.len() >= 24 => {
            let port = u16::from_be_bytes([data[2], data[3]]);
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&data[8..24]);
            let ip = std::net::Ipv6Addr::from(octets);
            format!("{{AF_INET6, [{ip}]:{port}}}")
        }
        libc::AF_UNIX => {
            let raw = &data[2..];
            let path = match raw.first() {
                None => "<unnamed>".to_string(),
                // Abstract socket names start with a NUL byte.
                Some(0) if raw.len() > 1 => {
                    format!("@{}", String::from_utf8_lossy(&raw[1..]).trim_end_matches('\0'))
                }
                Some(0) => "<unnamed>".to_string(),
                Some(_) => {
                    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                    String::from_utf8_lossy(&raw[..end]).into_owned()
                }
            };
            format!("{{AF_UNIX, {path}}}")
        }
        other => format!("{{family {other}}}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::memory::fake::FakeMemory;

    fn pid() -> Pid {
        Pid::from_raw(100)
    }

    fn args(values: &[u64]) -> [u64; 6] {
        let mut out = [0; 6];
        out[..values.len()].copy_from_slice(values);
        out
    }

    #[test]
    fn openat_with_path_and_flags() {
        let mem = FakeMemory::default().with_str(0x1000, "/etc/hosts");
        let decoder = SyscallDecoder::default();
        let at_fdcwd = libc::AT_FDCWD as i64 as u64;
        let flags = (libc::O_RDONLY | libc::O_CLOEXEC) as u64;
        let decoded = decoder.decode_entry(&mem, pid(), "openat", &args(&[at_fdcwd, 0x1000, flags, 0]));

        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0].text, "AT_FDCWD");
        assert_eq!(decoded[1].text, "'/etc/hosts'");
        assert!(decoded[1].is_path);
        assert_eq!(decoded[1].path(), Some("/etc/hosts"));
        assert_eq!(decoded[2].text, "O_RDONLY|O_CLOEXEC");
        assert_eq!(decoded[3].text, "0");

        assert_eq!(
            decoder.format_call("openat", &decoded, Some(3)),
            "openat(dfd=AT_FDCWD, filename='/etc/hosts', flags=O_RDONLY|O_CLOEXEC, mode=0) = 3"
        );
    }

    #[test]
    fn unreadable_path_uses_sentinel() {
        let decoder = SyscallDecoder::default();
        let decoded = decoder.decode_entry(&FakeMemory::default(), pid(), "unlink", &args(&[0xdead]));
        assert_eq!(decoded[0].text, NO_STRING);
        assert_eq!(decoded[0].path(), None);
    }

    #[test]
    fn long_strings_are_truncated() {
        let long = "a".repeat(50);
        let mem = FakeMemory::default().with_str(0x1000, &long);
        let decoder = SyscallDecoder::new(DecodeOptions {
            string_max_length: 8,
            max_array_count: 20,
        });
        let decoded = decoder.decode_entry(&mem, pid(), "chdir", &args(&[0x1000]));
        assert_eq!(decoded[0].text, "'aaaaaaaa'...");
    }

    #[test]
    fn argv_is_capped() {
        let mem = FakeMemory::default()
            .with_str(0x1000, "/bin/echo")
            .with_str(0x1100, "echo")
            .with_str(0x1200, "hi")
            .with_str(0x1300, "there")
            .with_pointers(0x2000, &[0x1100, 0x1200, 0x1300, 0])
            .with_pointers(0x3000, &[0]);
        let decoder = SyscallDecoder::new(DecodeOptions {
            string_max_length: 300,
            max_array_count: 2,
        });
        let decoded = decoder.decode_entry(&mem, pid(), "execve", &args(&[0x1000, 0x2000, 0x3000]));
        assert_eq!(decoded[0].text, "'/bin/echo'");
        assert_eq!(decoded[1].text, "['echo', 'hi', ...]");
        assert_eq!(decoded[2].text, "[]");
    }

    #[test]
    fn write_buffer_shown_at_entry() {
        let mem = FakeMemory::default().with(0x1000, b"hi\n");
        let decoder = SyscallDecoder::default();
        let decoded = decoder.decode_entry(&mem, pid(), "write", &args(&[1, 0x1000, 3]));
        assert_eq!(decoded[0].text, "1");
        assert_eq!(decoded[1].text, "'hi\\n'");
        assert_eq!(decoded[2].text, "3");
    }

    #[test]
    fn read_buffer_filled_at_exit() {
        let mem = FakeMemory::default().with(0x1000, b"root:x:0:0");
        let decoder = SyscallDecoder::default();
        let mut decoded = decoder.decode_entry(&mem, pid(), "read", &args(&[3, 0x1000, 4096]));
        assert_eq!(decoded[1].text, "0x1000");

        decoder.decode_exit(&mem, pid(), "read", &mut decoded, 4);
        assert_eq!(decoded[1].text, "'root'");

        let mut failed = decoder.decode_entry(&mem, pid(), "read", &args(&[3, 0x1000, 4096]));
        decoder.decode_exit(&mem, pid(), "read", &mut failed, -9);
        assert_eq!(failed[1].text, "0x1000");
    }

    #[test]
    fn connect_decodes_inet_address() {
        let mut sockaddr = vec![0u8; 16];
        sockaddr[..2].copy_from_slice(&(libc::AF_INET as u16).to_ne_bytes());
        sockaddr[2..4].copy_from_slice(&443u16.to_be_bytes());
        sockaddr[4..8].copy_from_slice(&[127, 0, 0, 1]);
        let mem = FakeMemory::default().with(0x1000, &sockaddr);
        let decoder = SyscallDecoder::default();
        let decoded = decoder.decode_entry(&mem, pid(), "connect", &args(&[3, 0x1000, 16]));
        assert_eq!(decoded[1].text, "{AF_INET, 127.0.0.1:443}");
    }

    #[test]
    fn unix_sockaddr() {
        let mut sockaddr = (libc::AF_UNIX as u16).to_ne_bytes().to_vec();
        sockaddr.extend_from_slice(b"/run/dbus.sock\0");
        let mem = FakeMemory::default().with(0x1000, &sockaddr);
        let text = decode_sockaddr(&mem, pid(), 0x1000, sockaddr.len());
        assert_eq!(text, "{AF_UNIX, /run/dbus.sock}");
    }

    #[test]
    fn scalars_follow_their_types() {
        let decoder = SyscallDecoder::default();
        let mem = FakeMemory::default();
        let decoded = decoder.decode_entry(&mem, pid(), "mkdirat", &args(&[5, 0, 0o755]));
        assert_eq!(decoded[0].text, "5");
        assert_eq!(decoded[1].text, "NULL");
        assert_eq!(decoded[2].text, "0755");

        let decoded = decoder.decode_entry(&mem, pid(), "kill", &args(&[u64::MAX, 9]));
        assert_eq!(decoded[0].text, "-1");

        let decoded = decoder.decode_entry(&mem, pid(), "socket", &args(&[2, 1 | 0o2000000, 0]));
        assert_eq!(decoded[0].text, "AF_INET");
        assert_eq!(decoded[1].text, "SOCK_STREAM|SOCK_CLOEXEC");

        let decoded = decoder.decode_entry(&mem, pid(), "mmap", &args(&[0, 4096, 3, 0x22, u64::MAX, 0]));
        assert_eq!(decoded[2].text, "PROT_READ|PROT_WRITE");
        assert_eq!(decoded[3].text, "MAP_PRIVATE|MAP_ANONYMOUS");
        assert_eq!(decoded[4].text, "-1");
    }

    #[test]
    fn unknown_syscall_gets_raw_arguments() {
        let decoder = SyscallDecoder::default();
        let decoded = decoder.decode_entry(&FakeMemory::default(), pid(), "nope", &args(&[1, 2]));
        assert_eq!(decoded.len(), 6);
        assert_eq!(decoded[0].name, "arg0");
        assert_eq!(decoded[1].text, "0x2");
    }

    #[test]
    fn results() {
        let open = catalog::lookup("open");
        assert_eq!(format_result(open, Some(3)), "3");
        assert_eq!(format_result(open, Some(-2)), "-1 ENOENT (No such file or directory)");
        assert_eq!(format_result(open, None), "?");
        assert_eq!(format_result(catalog::lookup("mmap"), Some(0x7f00_0000_0000)), "0x7f0000000000");
    }

    #[test]
    fn interrupted_calls_show_restart_errno() {
        let read = catalog::lookup("read");
        assert_eq!(
            format_result(read, Some(-512)),
            "? ERESTARTSYS (To be restarted if SA_RESTART is set)"
        );
        assert_eq!(
            format_result(catalog::lookup("nanosleep"), Some(-516)),
            "? ERESTART_RESTARTBLOCK (Interrupted by signal)"
        );
        assert_eq!(format_result(read, Some(-4)), "-1 EINTR (Interrupted system call)");
    }

    #[test]
    fn socket_type_names_packet_sockets() {
        assert_eq!(decode_socket_type(10), "SOCK_PACKET");
        assert_eq!(decode_socket_type(libc::SOCK_DGRAM as u64), "SOCK_DGRAM");
    }

    #[test]
    fn quoting_escapes_control_bytes() {
        assert_eq!(quote(b"a'b\\\x01", false), "'a\\'b\\\\\\x01'");
        assert_eq!(quote(b"", true), "''...");
    }
}
