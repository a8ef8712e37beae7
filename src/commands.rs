//! The user-facing commands and their dispatcher.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::classify::{Selection, classify, enclosing_function_name};
use crate::config::ConfigFlag;
use crate::host::{Host, Severity};
use crate::language::FileKind;
use crate::locate::find_all;
use crate::position::PositionTranslator;
use crate::region::extract_script;
use crate::synth::{self, DocumentEdit};
use crate::syntax::{ParseError, SyntaxTree};

pub const DELETE_ALL: &str = "Delete all";
pub const CANCEL: &str = "Cancel";
pub const NO_PRINT_CALLS: &str = "No console.log statements found";
pub const NO_SCRIPT_BLOCK: &str = "No <script> block found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Command {
    #[serde(rename = "smart-log.insertConsoleLog")]
    InsertConsoleLog,
    #[serde(rename = "smart-log.deleteConsoleLog")]
    DeleteConsoleLog,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::InsertConsoleLog, Command::DeleteConsoleLog];

    pub fn name(&self) -> &'static str {
        match self {
            Command::InsertConsoleLog => "smart-log.insertConsoleLog",
            Command::DeleteConsoleLog => "smart-log.deleteConsoleLog",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

/// How a command ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Inserted { edit: DocumentEdit },
    Deleted { count: usize },
    /// No script block or no print calls; the user was told
    NothingFound,
    /// The user declined the deletion
    Cancelled,
    /// No document or no usable selection; nothing to report
    NoOp,
    /// Unsupported file kind; the user was warned
    Unsupported,
    /// Applying the edits failed; the user was shown the detail
    Failed { detail: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn checked_kind<H: Host>(host: &mut H, path: &Path) -> Option<FileKind> {
    let kind = host.file_kind(path);
    if kind.is_none() {
        let message = format!("Only {} files are supported", FileKind::supported_list());
        host.show_message(Severity::Warning, &message);
    }
    kind
}

fn report_failure<H: Host>(host: &mut H, action: &str, detail: String) -> CommandOutcome {
    tracing::warn!(action, %detail, "edit application failed");
    host.show_message(Severity::Error, &format!("{action} failed: {detail}"));
    CommandOutcome::Failed { detail }
}

/// Insert a print statement for the current selection
pub fn insert_console_log<H: Host>(host: &mut H) -> Result<CommandOutcome, CommandError> {
    let Some(document) = host.active_document() else {
        return Ok(CommandOutcome::NoOp);
    };
    let Some(kind) = checked_kind(host, &document.path) else {
        return Ok(CommandOutcome::Unsupported);
    };
    let Some(range) = host.selection().filter(|range| !range.is_empty()) else {
        return Ok(CommandOutcome::NoOp);
    };

    let Some(script) = extract_script(&document.text, kind) else {
        host.show_message(Severity::Info, NO_SCRIPT_BLOCK);
        return Ok(CommandOutcome::NothingFound);
    };
    let translator = PositionTranslator::new(&document.text, script.region());

    let (Some(offset), Some(active_line), Some(raw_text)) = (
        script.relative_offset(range.start_offset),
        translator.relative_line(range.active_line),
        document.text.get(range.start_offset..range.end_offset),
    ) else {
        tracing::debug!(?range, "selection outside the analyzable text");
        return Ok(CommandOutcome::NoOp);
    };

    let tree = SyntaxTree::parse(script.content(), kind.grammar())?;
    let Some(node) = tree.node_at(offset) else {
        return Ok(CommandOutcome::NoOp);
    };

    let selection = Selection {
        node,
        raw_text: raw_text.to_string(),
        active_line,
    };
    let target = classify(&selection);
    let function_name = enclosing_function_name(&selection.node);
    let suffix = host.config_flag(ConfigFlag::Suffix).unwrap_or_default();

    let edit = synth::insertion(
        &target,
        &selection.raw_text,
        function_name.as_deref(),
        &suffix,
        &translator,
    );

    match host.apply_edits(std::slice::from_ref(&edit)) {
        Ok(()) => Ok(CommandOutcome::Inserted { edit }),
        Err(err) => Ok(report_failure(host, "Insert", err.to_string())),
    }
}

/// Find every print call, confirm, and delete them in one batch
///
/// `highlight` is the live highlight left by a previous scan, if any. Every
/// scan releases it first; a new one is shown when highlighting is enabled
/// and released again before deleting.
pub fn delete_console_logs<H: Host>(
    host: &mut H,
    highlight: &mut Option<H::Highlight>,
) -> Result<CommandOutcome, CommandError> {
    if let Some(previous) = highlight.take() {
        host.dispose_highlight(previous);
    }

    let Some(document) = host.active_document() else {
        return Ok(CommandOutcome::NoOp);
    };
    let Some(kind) = checked_kind(host, &document.path) else {
        return Ok(CommandOutcome::Unsupported);
    };

    let Some(script) = extract_script(&document.text, kind) else {
        host.show_message(Severity::Info, NO_PRINT_CALLS);
        return Ok(CommandOutcome::NothingFound);
    };

    let tree = SyntaxTree::parse(script.content(), kind.grammar())?;
    let spans = find_all(&tree);
    if spans.is_empty() {
        host.show_message(Severity::Info, NO_PRINT_CALLS);
        return Ok(CommandOutcome::NothingFound);
    }

    let translator = PositionTranslator::new(&document.text, script.region());
    let highlighting = host.config_flag(ConfigFlag::DeletHighlight).as_deref() == Some("on");
    if highlighting {
        let ranges = synth::highlight_ranges(&spans, script.content(), &translator);
        *highlight = Some(host.show_highlight(&ranges));
    }

    let question = format!("Found {} console.log statement(s). Delete them?", spans.len());
    let choice = host.prompt_confirmation(&question, &[DELETE_ALL, CANCEL]);
    if choice.as_deref() != Some(DELETE_ALL) {
        return Ok(CommandOutcome::Cancelled);
    }

    if highlighting {
        if let Some(current) = highlight.take() {
            host.dispose_highlight(current);
        }
    }

    let edits = synth::deletions(&spans, script.content(), &translator);
    match host.apply_edits(&edits) {
        Ok(()) => {
            tracing::info!(count = spans.len(), path = %document.path.display(), "deleted print calls");
            host.show_message(
                Severity::Info,
                &format!("Deleted {} console.log statement(s)", spans.len()),
            );
            Ok(CommandOutcome::Deleted { count: spans.len() })
        }
        Err(err) => Ok(report_failure(host, "Delete", err.to_string())),
    }
}

/// Runs commands against a host, owning the single live highlight
pub struct Dispatcher<H: Host> {
    host: H,
    highlight: Option<H::Highlight>,
}

impl<H: Host> Dispatcher<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            highlight: None,
        }
    }

    pub fn run(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        tracing::debug!(command = command.name(), "running command");
        match command {
            Command::InsertConsoleLog => insert_console_log(&mut self.host),
            Command::DeleteConsoleLog => delete_console_logs(&mut self.host, &mut self.highlight),
        }
    }

    /// Run a command by its registered name
    pub fn run_named(&mut self, name: &str) -> Option<Result<CommandOutcome, CommandError>> {
        Command::from_name(name).map(|command| self.run(command))
    }

    pub fn has_live_highlight(&self) -> bool {
        self.highlight.is_some()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
