//! Primitives the commands need from the environment they run in.
//!
//! An editor integration, the CLI file host and the test doubles all
//! implement [`Host`]; the commands never touch files or terminals directly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigFlag;
use crate::edit::EditError;
use crate::file::FileError;
use crate::language::{FileKind, detect_file_kind};
use crate::position::DocumentRange;
use crate::synth::DocumentEdit;

/// The document a command operates on
#[derive(Debug, Clone)]
pub struct ActiveDocument {
    pub path: PathBuf,
    pub text: String,
}

/// The user's selection in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// Byte offset where the selection starts
    pub start_offset: usize,
    /// Byte offset where the selection ends (exclusive)
    pub end_offset: usize,
    /// 0-indexed line of the caret
    pub active_line: usize,
}

impl SelectionRange {
    pub fn is_empty(&self) -> bool {
        self.end_offset <= self.start_offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Failure reported by `Host::apply_edits`
#[derive(Debug, Error)]
pub enum HostError {
    #[error("document changed since it was read ({0})")]
    DocumentChanged(#[source] EditError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    File(#[from] FileError),
    #[error("{0}")]
    Rejected(String),
}

pub trait Host {
    /// Handle of a live highlight
    type Highlight;

    fn active_document(&self) -> Option<ActiveDocument>;

    fn selection(&self) -> Option<SelectionRange>;

    fn file_kind(&self, path: &Path) -> Option<FileKind> {
        detect_file_kind(path)
    }

    /// Apply a batch of edits, all or nothing
    fn apply_edits(&mut self, edits: &[DocumentEdit]) -> Result<(), HostError>;

    fn show_highlight(&mut self, ranges: &[DocumentRange]) -> Self::Highlight;

    fn dispose_highlight(&mut self, handle: Self::Highlight);

    /// Ask the user to pick one of `choices`; `None` when dismissed
    fn prompt_confirmation(&mut self, message: &str, choices: &[&str]) -> Option<String>;

    fn config_flag(&self, flag: ConfigFlag) -> Option<String>;

    fn show_message(&mut self, severity: Severity, message: &str);
}
