use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use smart_log::{
    Command, CommandOutcome, CommandReport, Confirmation, Dispatcher, DocumentEdit,
    DocumentPosition, FileHost, Settings, Severity, position_to_offset,
    tracing_config::init_tracing,
};

/// Insert and remove console.log statements in JS/TS/Vue files
#[derive(Parser, Debug)]
#[command(name = "smart-log")]
#[command(version)]
#[command(about = "Syntax-aware console.log insertion and cleanup", long_about = None)]
struct Args {
    /// Settings file (defaults to .smart-log.json next to the document)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Text appended to inserted labels
    #[arg(long, global = true)]
    suffix: Option<String>,

    /// Highlight print calls before asking to delete them
    #[arg(long, global = true)]
    highlight: bool,

    /// Output structured JSON instead of human-readable
    #[arg(short, long, global = true)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Insert a console.log for the selection
    Insert {
        /// Document to edit
        #[arg(short, long)]
        file: PathBuf,

        /// Selection start as LINE:COLUMN (1-indexed)
        #[arg(long, value_parser = parse_location)]
        at: (usize, usize),

        /// Selection length in bytes (defaults to the identifier at --at)
        #[arg(long)]
        len: Option<usize>,

        /// Compute the edit without writing the document
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete every console.log call
    Delete {
        /// Document to edit
        #[arg(short, long)]
        file: PathBuf,

        /// Delete without asking
        #[arg(short, long, conflicts_with = "no")]
        yes: bool,

        /// Only report, answer every prompt with cancel
        #[arg(short, long)]
        no: bool,

        /// Compute the edits without writing the document
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_location(value: &str) -> Result<(usize, usize), String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{value}'"))?;
    let parse = |part: &str| match part.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("'{part}' is not a positive number")),
    };
    Ok((parse(line)?, parse(column)?))
}

fn load_settings(args: &Args, file: &Path) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(file)?,
    };
    if let Some(suffix) = &args.suffix {
        settings.suffix = Some(suffix.clone());
    }
    if args.highlight {
        settings.delete_highlight = Some("on".to_string());
    }
    Ok(settings)
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let (file, dry_run) = match &args.command {
        CliCommand::Insert { file, dry_run, .. } | CliCommand::Delete { file, dry_run, .. } => {
            (file, *dry_run)
        }
    };

    let settings = load_settings(args, file)?;
    let mut host = FileHost::open(file, settings)
        .with_context(|| format!("Failed to read file '{}'", file.display()))?
        .with_dry_run(dry_run);

    let command = match &args.command {
        CliCommand::Insert { at, len, .. } => {
            let (line, column) = *at;
            let position = DocumentPosition::new(line - 1, column - 1);
            let Some(offset) = position_to_offset(host.text(), position) else {
                bail!("{}:{line}:{column} is outside the document", file.display());
            };
            match len {
                Some(len) => host.select(offset, *len),
                None => host.select_word_at(offset),
            }
            Command::InsertConsoleLog
        }
        CliCommand::Delete { yes, no, .. } => {
            let confirmation = if *yes {
                Confirmation::AssumeYes
            } else if *no {
                Confirmation::AssumeNo
            } else {
                Confirmation::Ask(Box::new(io::stdin().lock()))
            };
            host = host.with_confirmation(confirmation);
            Command::DeleteConsoleLog
        }
    };

    let mut dispatcher = Dispatcher::new(host);
    let outcome = dispatcher.run(command)?;
    let host = dispatcher.into_host();

    let report = CommandReport::new(command, outcome, &host, dry_run);
    output_report(&report, host.final_content(), args.json, args.output.as_ref())?;

    Ok(match report.outcome {
        CommandOutcome::Failed { .. } => ExitCode::from(1),
        CommandOutcome::Unsupported => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    })
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Format and output the report
fn output_report(
    report: &CommandReport,
    final_content: Option<&str>,
    json_mode: bool,
    output_path: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let output = if json_mode {
        serde_json::to_string_pretty(report)?
    } else {
        let mut lines = Vec::new();
        for message in &report.messages {
            let tag = match message.severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            lines.push(format!("{tag}: {}", message.text));
        }
        if let CommandOutcome::Inserted {
            edit: DocumentEdit::Insert { position, text },
        } = &report.outcome
        {
            lines.push(format!("Inserted at line {}: {}", position.line + 1, text.trim_end()));
        }
        if report.dry_run {
            if let Some(content) = final_content {
                lines.push(String::new());
                lines.push(content.trim_end_matches('\n').to_string());
            }
        }
        lines.join("\n")
    };

    match output_path {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("Failed to write output to '{}'", path.display()))?,
        None => println!("{output}"),
    }
    Ok(())
}
