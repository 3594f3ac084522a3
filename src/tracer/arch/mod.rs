use crate::error::{TraceResult, TracerError};
use nix::unistd::Pid;

pub mod aarch64;
pub mod x86_64;

/// The register view the dispatcher needs at a syscall stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyscallRegisters {
    pub number: u64,
    pub args: [u64; 6],
    pub return_value: i64,
    pub instruction_pointer: u64,
}

pub trait Architecture: Send + Sync {
    fn name(&self) -> &'static str;
    fn read_registers(&self, pid: Pid) -> TraceResult<RawRegisters>;
    fn syscall_number(&self, regs: &RawRegisters) -> u64;
    fn syscall_args(&self, regs: &RawRegisters) -> [u64; 6];
    fn return_value(&self, regs: &RawRegisters) -> i64;
    fn instruction_pointer(&self, regs: &RawRegisters) -> u64;
    fn syscall_table(&self) -> &'static [(u64, &'static str)];

    fn syscall_name(&self, nr: u64) -> Option<&'static str> {
        let table = self.syscall_table();
        table
            .binary_search_by_key(&nr, |&(n, _)| n)
            .ok()
            .map(|idx| table[idx].1)
    }

    fn syscall_registers(&self, pid: Pid) -> TraceResult<SyscallRegisters> {
        let regs = self.read_registers(pid)?;
        Ok(SyscallRegisters {
            number: self.syscall_number(&regs),
            args: self.syscall_args(&regs),
            return_value: self.return_value(&regs),
            instruction_pointer: self.instruction_pointer(&regs),
        })
    }
}

#[derive(Debug, Clone)]
pub enum RawRegisters {
    X86_64(x86_64::UserRegs),
    Aarch64(aarch64::UserRegs),
}

pub fn detect_architecture() -> TraceResult<Box<dyn Architecture>> {
    #[cfg(target_arch = "x86_64")]
    {
        Ok(Box::new(x86_64::X86_64Arch))
    }

    #[cfg(target_arch = "aarch64")]
    {
        Ok(Box::new(aarch64::Aarch64Arch))
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        Err(TracerError::UnsupportedArch(std::env::consts::ARCH.to_string()))
    }
}

/// Syscall table of the architecture this binary was built for.
pub fn native_syscall_table() -> &'static [(u64, &'static str)] {
    #[cfg(target_arch = "aarch64")]
    {
        aarch64::SYSCALLS
    }

    #[cfg(not(target_arch = "aarch64"))]
    {
        x86_64::SYSCALLS
    }
}

pub(super) fn unsupported(found: &str) -> TracerError {
    TracerError::UnsupportedArch(format!("register set {found} does not match this architecture"))
}
