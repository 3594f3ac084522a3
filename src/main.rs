use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use sysscope::aggregate::Aggregates;
use sysscope::cli::{Cli, Commands, ListArgs, RunArgs};
use sysscope::config::{self, SysscopeConfig};
use sysscope::output::OutputManager;
use sysscope::{ChannelSink, SessionOutcome, TraceEvent, TracerSession};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(match &cli.command {
        Commands::Run(args) => args.verbose,
        Commands::List(args) => args.verbose,
        Commands::Config => 0,
    });

    match cli.command {
        Commands::Run(args) => {
            let exit_code = run(args)?;
            std::process::exit(exit_code);
        }
        Commands::List(args) => list(args),
        Commands::Config => {
            print!("{}", config::default_config_toml());
            Ok(())
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 | 1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&std::path::Path>) -> SysscopeConfig {
    let expanded = path.map(config::expand_tilde);
    config::load_config(expanded.as_deref())
}

fn run(args: RunArgs) -> Result<i32> {
    let config = load_config(args.config.as_deref());
    let filter = args.build_filter(&config)?;
    let show_ip = args.show_ip || config.show_ip;
    let (program, program_args) = args.program();

    let jsonl = args
        .output
        .as_ref()
        .map(|path| {
            std::fs::File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))
        })
        .transpose()?;
    let mut output = OutputManager::new(jsonl, args.verbose, args.no_color, show_ip);
    let mut aggregates = Aggregates::new();

    let started = Instant::now();
    let (sink, events) = ChannelSink::channel();
    let session = TracerSession::new(program, program_args.to_vec())
        .filter(filter)
        .decode_options(config.decode_options())
        .show_ip(show_ip)
        .start(sink)
        .context("failed to start tracer")?;

    let canceller = session.canceller();
    ctrlc::set_handler(move || canceller.cancel()).context("failed to set signal handler")?;

    let mut deadline = (args.timeout > 0).then(|| started + Duration::from_secs(args.timeout));
    let outcome = loop {
        let next = match deadline {
            Some(at) => events.recv_timeout(at.saturating_duration_since(Instant::now())),
            None => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let event = match next {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Timeout after {}s, cancelling trace", args.timeout);
                session.cancel();
                deadline = None;
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break None,
        };

        output.emit(&event).context("failed to write trace output")?;
        aggregates.record(&event);
        if let TraceEvent::Ended(outcome) = event {
            break Some(outcome);
        }
    };
    session.join();

    let outcome = outcome.unwrap_or_else(|| SessionOutcome::Failed {
        reason: "tracer stopped without reporting an outcome".to_string(),
    });
    let summary = aggregates.summary(
        started.elapsed().as_millis() as u64,
        config.counts_only_called,
        config.files_only_existing,
    );
    output.emit(&TraceEvent::Summary(summary))?;
    output.flush()?;

    Ok(outcome.exit_code())
}

fn list(args: ListArgs) -> Result<()> {
    let filter = load_config(args.config.as_deref()).filter();
    let mut out = io::stdout().lock();

    for entry in filter.entries() {
        if (args.files || args.sockets)
            && !((args.files && entry.has_path_argument) || (args.sockets && entry.is_socket_related))
        {
            continue;
        }
        if args.selected && !entry.checked {
            continue;
        }

        let mark = if entry.checked {
            "[x]".green().to_string()
        } else {
            "[ ]".dimmed().to_string()
        };
        if args.verbose == 0 {
            writeln!(out, "{mark} {}", entry.name)?;
            continue;
        }

        let mut flags = String::new();
        if entry.has_path_argument {
            flags.push_str(" [path]");
        }
        if entry.is_socket_related {
            flags.push_str(" [socket]");
        }
        writeln!(
            out,
            "{mark} {} {} ({}){}",
            format!("{:<24}", entry.name).cyan(),
            entry.return_type,
            entry.arguments,
            flags.dimmed()
        )?;
    }
    Ok(())
}
