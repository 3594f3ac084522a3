use crate::catalog;
use crate::config::SysscopeConfig;
use crate::error::{Result, SysscopeError};
use crate::filter::SyscallFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sysscope")]
#[command(about = "Trace a program and its children through every system call")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a program under the tracer
    Run(RunArgs),

    /// List known syscalls and whether they are selected
    List(ListArgs),

    /// Print the default configuration file
    Config,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Program to trace, followed by its arguments
    #[arg(required = true, trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Report exactly these syscalls (comma-separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub syscalls: Vec<String>,

    /// Also report every syscall that takes a path
    #[arg(long)]
    pub files: bool,

    /// Also report every socket syscall
    #[arg(long)]
    pub sockets: bool,

    /// Never report these syscalls (comma-separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// JSONL output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Increase verbosity (-v syscalls, -vv files)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Show the instruction pointer of each call
    #[arg(long)]
    pub show_ip: bool,

    /// Cancel the trace after N seconds (0 = never)
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    pub timeout: u64,

    /// Config file (default: ~/.sysscope/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only syscalls that take a path
    #[arg(long)]
    pub files: bool,

    /// Only socket syscalls
    #[arg(long)]
    pub sockets: bool,

    /// Only syscalls selected by the configuration
    #[arg(long)]
    pub selected: bool,

    /// Show argument signatures
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: ~/.sysscope/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// `--syscalls` replaces the configured selection, `--files` and
    /// `--sockets` add to it, `--ignore` removes from the result.
    pub fn build_filter(&self, config: &SysscopeConfig) -> Result<SyscallFilter> {
        let unknown = catalog::unknown_names(self.syscalls.iter().chain(&self.ignore).map(String::as_str));
        if !unknown.is_empty() {
            return Err(SysscopeError::InvalidArgument(format!(
                "unknown syscalls: {}",
                unknown.join(", ")
            )));
        }

        let mut filter = if !self.syscalls.is_empty() {
            SyscallFilter::from_names(self.syscalls.iter().cloned())
        } else if self.files || self.sockets {
            SyscallFilter::none()
        } else {
            config.filter()
        };
        if self.files {
            filter.select_where(|proto| proto.has_path_argument);
        }
        if self.sockets {
            filter.select_where(|proto| proto.is_socket_related);
        }
        for name in &self.ignore {
            filter.deselect(name);
        }
        Ok(filter)
    }

    pub fn program(&self) -> (&str, &[String]) {
        match self.command.split_first() {
            Some((program, args)) => (program.as_str(), args),
            None => ("", &[]),
        }
    }
}
