use crate::error::{TraceResult, TracerError};
use nix::unistd::Pid;

const WORD: usize = std::mem::size_of::<u64>();

/// Read access to a tracee's address space.
pub trait MemoryReader {
    fn read_bytes(&self, pid: Pid, addr: u64, len: usize) -> TraceResult<Vec<u8>>;

    /// Read a NUL-terminated string of at most `max_len` bytes. The flag is
    /// true when the string was cut at `max_len`.
    fn read_c_string(&self, pid: Pid, addr: u64, max_len: usize) -> TraceResult<(Vec<u8>, bool)>;

    fn read_word(&self, pid: Pid, addr: u64) -> TraceResult<u64> {
        let bytes = self.read_bytes(pid, addr, WORD)?;
        let word: [u8; WORD] = bytes.as_slice().try_into().map_err(|_| TracerError::MemoryRead {
            addr,
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short word read",
            )),
        })?;
        Ok(u64::from_ne_bytes(word))
    }
}

/// Reads a live tracee through `process_vm_readv` and `PTRACE_PEEKDATA`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceeMemory;

impl MemoryReader for TraceeMemory {
    fn read_bytes(&self, pid: Pid, addr: u64, len: usize) -> TraceResult<Vec<u8>> {
        read_memory(pid, addr, len)
    }

    fn read_c_string(&self, pid: Pid, addr: u64, max_len: usize) -> TraceResult<(Vec<u8>, bool)> {
        read_string(pid, addr, max_len)
    }
}

/// process_vm_readv first, word-wise ptrace reads as the fallback.
pub fn read_memory(pid: Pid, addr: u64, len: usize) -> TraceResult<Vec<u8>> {
    if len == 0 {
        return Ok(Vec::new());
    }
    match read_memory_process_vm(pid, addr, len) {
        Ok(data) => return Ok(data),
        Err(e) => {
            log::debug!("process_vm_readv failed, falling back to ptrace: {}", e);
        }
    }
    read_memory_ptrace(pid, addr, len)
}

fn read_memory_process_vm(pid: Pid, addr: u64, len: usize) -> TraceResult<Vec<u8>> {
    let mut buf = vec![0u8; len];

    let local_iov = libc::iovec {
        iov_base: buf.as_mut_ptr() as *mut libc::c_void,
        iov_len: len,
    };
    let remote_iov = libc::iovec {
        iov_base: addr as *mut libc::c_void,
        iov_len: len,
    };

    let res = unsafe { libc::process_vm_readv(pid.as_raw(), &local_iov, 1, &remote_iov, 1, 0) };

    if res < 0 {
        return Err(TracerError::MemoryRead {
            addr,
            source: Box::new(std::io::Error::last_os_error()),
        });
    }

    buf.truncate(res as usize);
    Ok(buf)
}

fn read_memory_ptrace(pid: Pid, addr: u64, len: usize) -> TraceResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    let mut current = addr;

    while buf.len() < len {
        match nix::sys::ptrace::read(pid, current as *mut libc::c_void) {
            Ok(word) => {
                let bytes = word.to_ne_bytes();
                let take = (len - buf.len()).min(WORD);
                buf.extend_from_slice(&bytes[..take]);
                current += WORD as u64;
            }
            // A partial read still counts when something came back.
            Err(_) if !buf.is_empty() => break,
            Err(e) => {
                return Err(TracerError::MemoryRead {
                    addr,
                    source: Box::new(std::io::Error::from(e)),
                });
            }
        }
    }

    Ok(buf)
}

/// Read a NUL-terminated string word by word, stopping at `max_len` bytes.
pub fn read_string(pid: Pid, addr: u64, max_len: usize) -> TraceResult<(Vec<u8>, bool)> {
    let mut result = Vec::new();
    let mut current = addr;

    loop {
        let word = nix::sys::ptrace::read(pid, current as *mut libc::c_void).map_err(|e| {
            TracerError::MemoryRead {
                addr,
                source: Box::new(std::io::Error::from(e)),
            }
        })?;
        for byte in word.to_ne_bytes() {
            if byte == 0 {
                return Ok((result, false));
            }
            if result.len() == max_len {
                return Ok((result, true));
            }
            result.push(byte);
        }
        current += WORD as u64;
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::BTreeMap;

    /// Sparse in-memory address space for decoder and dispatcher tests.
    #[derive(Debug, Default, Clone)]
    pub struct FakeMemory {
        regions: BTreeMap<u64, Vec<u8>>,
    }

    impl FakeMemory {
        pub fn with(mut self, addr: u64, bytes: &[u8]) -> Self {
            self.insert(addr, bytes);
            self
        }

        pub fn insert(&mut self, addr: u64, bytes: &[u8]) {
            self.regions.insert(addr, bytes.to_vec());
        }

        pub fn with_str(self, addr: u64, s: &str) -> Self {
            let mut bytes = s.as_bytes().to_vec();
            bytes.push(0);
            self.with(addr, &bytes)
        }

        pub fn with_pointers(self, addr: u64, pointers: &[u64]) -> Self {
            let bytes: Vec<u8> = pointers.iter().flat_map(|p| p.to_ne_bytes()).collect();
            self.with(addr, &bytes)
        }

        fn slice(&self, addr: u64) -> Option<&[u8]> {
            let (&start, bytes) = self.regions.range(..=addr).next_back()?;
            let offset = (addr - start) as usize;
            bytes.get(offset..)
        }

        fn fault(addr: u64) -> TracerError {
            TracerError::MemoryRead {
                addr,
                source: Box::new(std::io::Error::from_raw_os_error(libc::EFAULT)),
            }
        }
    }

    impl MemoryReader for FakeMemory {
        fn read_bytes(&self, _pid: Pid, addr: u64, len: usize) -> TraceResult<Vec<u8>> {
            let bytes = self.slice(addr).filter(|b| !b.is_empty()).ok_or_else(|| Self::fault(addr))?;
            Ok(bytes[..len.min(bytes.len())].to_vec())
        }

        fn read_c_string(&self, _pid: Pid, addr: u64, max_len: usize) -> TraceResult<(Vec<u8>, bool)> {
            let bytes = self.slice(addr).ok_or_else(|| Self::fault(addr))?;
            match bytes.iter().position(|&b| b == 0) {
                Some(end) if end <= max_len => Ok((bytes[..end].to_vec(), false)),
                _ => Ok((bytes[..max_len.min(bytes.len())].to_vec(), true)),
            }
        }
    }

    #[test]
    fn fake_reads_strings_and_words() {
        let mem = FakeMemory::default()
            .with_str(0x1000, "hello")
            .with_pointers(0x2000, &[0x1000, 0]);
        let pid = Pid::from_raw(1);
        assert_eq!(mem.read_c_string(pid, 0x1000, 10).unwrap(), (b"hello".to_vec(), false));
        assert_eq!(mem.read_c_string(pid, 0x1000, 3).unwrap(), (b"hel".to_vec(), true));
        assert_eq!(mem.read_word(pid, 0x2000).unwrap(), 0x1000);
        assert_eq!(mem.read_word(pid, 0x2008).unwrap(), 0);
        assert!(mem.read_bytes(pid, 0x10, 4).is_err());
    }
}
