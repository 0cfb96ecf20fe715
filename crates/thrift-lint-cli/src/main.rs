//! Command line entry point for `thrift-lint`.

mod config;

use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use thrift_lint_core::ast::Pos;
use thrift_lint_core::{Linter, Message, Messages, Severity};

use crate::config::{build_checks, Config, CONFIG_CHECK};

#[derive(Parser)]
#[command(name = "thrift-lint", version, about = "A semantic linter for Thrift IDL files")]
struct Cli {
    /// Directory to search for included files (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    includes: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress warnings in the output
    #[arg(long)]
    errors_only: bool,

    /// List all checks with their enabled/disabled status and exit
    #[arg(short, long)]
    list: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Filename reported for input read from stdin
    #[arg(long, value_name = "NAME", default_value = "stdin")]
    stdin_filename: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Thrift files to lint, or `-` for stdin
    #[arg(value_name = "FILE", required_unless_present = "list")]
    files: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One `file:line:col: severity: message (check)` line per finding
    Text,
    /// A JSON array of findings
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (config, config_path) = Config::load(cli.config.as_deref())?;
    let (all, problems) = build_checks(&config);
    let active = if config.checks.enabled.is_empty() {
        all.without(&config.checks.disabled)
    } else {
        all.with(&config.checks.enabled)
            .without(&config.checks.disabled)
    };

    if cli.list {
        let enabled = active.sorted_names();
        for name in all.sorted_names() {
            let status = if enabled.contains(&name) {
                "enabled"
            } else {
                "disabled"
            };
            println!("{name} ({status})");
        }
        return Ok(());
    }

    let mut messages = Messages::new();
    for problem in problems {
        messages.push(Message::new(
            config_path.display().to_string(),
            Pos::new(1, 1),
            CONFIG_CHECK,
            Severity::Error,
            problem,
        ));
    }

    let mut include_dirs = config.includes.clone();
    include_dirs.extend(cli.includes.iter().cloned());
    let linter = Linter::new(active).with_include_dirs(include_dirs);

    for file in &cli.files {
        if file.as_os_str() == "-" {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("unable to read stdin")?;
            messages.extend(linter.lint(&cli.stdin_filename, &source));
        } else {
            let filename = file.display().to_string();
            let source = std::fs::read_to_string(file)
                .with_context(|| format!("unable to read file {filename:?}"))?;
            messages.extend(linter.lint(&filename, &source));
        }
    }

    // The exit status reflects everything found, even when --errors-only
    // hides warnings from the output.
    let mut status = 0;
    for message in &messages {
        status |= match message.severity {
            Severity::Warning => 1,
            Severity::Error => 2,
        };
    }

    let visible: Vec<&Message> = messages
        .iter()
        .filter(|m| !cli.errors_only || m.severity >= Severity::Error)
        .collect();
    match cli.format {
        Format::Text => {
            for message in &visible {
                println!("{message}");
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
    }

    std::process::exit(status)
}
