use serde::Serialize;
use uuid::Uuid;

use crate::commands::{Command, CommandOutcome};
use crate::file_host::{FileHost, HostMessage};
use crate::synth::DocumentEdit;

/// Generate a unique execution ID
pub fn generate_execution_id() -> String {
    Uuid::new_v4().to_string()
}

/// Machine-readable result of one CLI command
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub execution_id: String,
    pub command: Command,
    pub file: String,
    pub dry_run: bool,
    #[serde(flatten)]
    pub outcome: CommandOutcome,
    pub messages: Vec<HostMessage>,
    pub edits: Vec<DocumentEdit>,
    /// Checksum of the document as it was read
    pub original_checksum: String,
    /// Checksum after the edits, when any were applied
    pub final_checksum: Option<String>,
}

impl CommandReport {
    pub fn new(command: Command, outcome: CommandOutcome, host: &FileHost, dry_run: bool) -> Self {
        Self {
            execution_id: generate_execution_id(),
            command,
            file: host.path().display().to_string(),
            dry_run,
            outcome,
            messages: host.messages().to_vec(),
            edits: host.applied_edits().to_vec(),
            original_checksum: host.original_checksum().to_string(),
            final_checksum: host.final_content().map(crate::edit::compute_checksum),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(
            self.outcome,
            CommandOutcome::Failed { .. } | CommandOutcome::Unsupported
        )
    }
}
