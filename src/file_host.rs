//! `Host` over a document on disk, driven from the command line.

use std::io::{BufRead, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::{ConfigFlag, Settings};
use crate::edit::{Edit, apply_edits, verify_checksum};
use crate::file::{FileContent, FileError, read_file, write_file};
use crate::host::{ActiveDocument, Host, HostError, SelectionRange, Severity};
use crate::position::{DocumentRange, offset_to_position};
use crate::synth::DocumentEdit;

/// How confirmation prompts are answered
pub enum Confirmation {
    /// Always pick the first choice
    AssumeYes,
    /// Always dismiss
    AssumeNo,
    /// Ask on stderr, read the answer from the reader
    Ask(Box<dyn BufRead>),
}

impl std::fmt::Debug for Confirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confirmation::AssumeYes => f.write_str("AssumeYes"),
            Confirmation::AssumeNo => f.write_str("AssumeNo"),
            Confirmation::Ask(_) => f.write_str("Ask"),
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostMessage {
    pub severity: Severity,
    pub text: String,
}

/// Handle of a highlight rendered by the file host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightId(u64);

#[derive(Debug)]
pub struct FileHost {
    document: FileContent,
    original_checksum: String,
    selection: Option<SelectionRange>,
    settings: Settings,
    confirmation: Confirmation,
    dry_run: bool,
    messages: Vec<HostMessage>,
    applied: Vec<DocumentEdit>,
    final_content: Option<String>,
    next_highlight: u64,
    live_highlight: Option<HighlightId>,
}

impl FileHost {
    pub fn open<P: AsRef<Path>>(path: P, settings: Settings) -> Result<Self, FileError> {
        let document = read_file(path)?;
        Ok(Self {
            original_checksum: document.checksum.clone(),
            document,
            selection: None,
            settings,
            confirmation: Confirmation::AssumeNo,
            dry_run: false,
            messages: Vec::new(),
            applied: Vec::new(),
            final_content: None,
            next_highlight: 0,
            live_highlight: None,
        })
    }

    pub fn with_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn path(&self) -> &Path {
        &self.document.path
    }

    pub fn text(&self) -> &str {
        &self.document.content
    }

    /// Select `len` bytes starting at `offset`
    pub fn select(&mut self, offset: usize, len: usize) {
        let end_offset = offset.saturating_add(len).min(self.document.content.len());
        self.selection = Some(SelectionRange {
            start_offset: offset,
            end_offset,
            active_line: offset_to_position(&self.document.content, end_offset).line,
        });
    }

    /// Select the identifier touching `offset`
    ///
    /// Leaves the selection empty when there is none.
    pub fn select_word_at(&mut self, offset: usize) {
        let text = &self.document.content;
        let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
        let offset = offset.min(text.len());
        if !text.is_char_boundary(offset) {
            return;
        }

        let start = text[..offset]
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_word(c))
            .last()
            .map_or(offset, |(idx, _)| idx);
        let end = text[offset..]
            .char_indices()
            .find(|&(_, c)| !is_word(c))
            .map_or(text.len(), |(idx, _)| offset + idx);

        self.select(start, end - start);
    }

    pub fn messages(&self) -> &[HostMessage] {
        &self.messages
    }

    /// Edits handed to `apply_edits` that went through
    pub fn applied_edits(&self) -> &[DocumentEdit] {
        &self.applied
    }

    /// Document text after the last applied batch
    pub fn final_content(&self) -> Option<&str> {
        self.final_content.as_deref()
    }

    /// Checksum of the document as first read
    pub fn original_checksum(&self) -> &str {
        &self.original_checksum
    }

    pub fn live_highlight(&self) -> Option<HighlightId> {
        self.live_highlight
    }

    fn ask(reader: &mut dyn BufRead, message: &str, choices: &[&str]) -> Option<String> {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
        for (idx, choice) in choices.iter().enumerate() {
            let _ = writeln!(stderr, "  {}) {choice}", idx + 1);
        }
        let _ = write!(stderr, "> ");
        let _ = stderr.flush();

        let mut answer = String::new();
        reader.read_line(&mut answer).ok()?;
        let answer = answer.trim();

        let picked = match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => choices.first().copied(),
            _ => answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| choices.get(idx).copied())
                .or_else(|| choices.iter().copied().find(|c| c.eq_ignore_ascii_case(answer))),
        };
        picked.map(str::to_string)
    }
}

impl Host for FileHost {
    type Highlight = HighlightId;

    fn active_document(&self) -> Option<ActiveDocument> {
        Some(ActiveDocument {
            path: self.document.path.clone(),
            text: self.document.content.clone(),
        })
    }

    fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    /// Re-reads the file and refuses to write if it changed since `open`
    fn apply_edits(&mut self, edits: &[DocumentEdit]) -> Result<(), HostError> {
        let on_disk = read_file(&self.document.path)?;
        verify_checksum(&on_disk.content, &self.document.checksum)
            .map_err(HostError::DocumentChanged)?;

        let byte_edits: Vec<Edit> = edits
            .iter()
            .map(|edit| edit.to_byte_edit(&on_disk.content))
            .collect();
        let result = apply_edits(&on_disk.content, &on_disk.checksum, &byte_edits)?;

        if self.dry_run {
            tracing::info!(edits = result.applied, "dry run, document left untouched");
        } else {
            write_file(&self.document.path, &result.content)?;
            tracing::info!(
                edits = result.applied,
                byte_shift = result.byte_shift,
                checksum = %result.checksum,
                "applied edit batch"
            );
            self.document.content = result.content.clone();
            self.document.checksum = result.checksum.clone();
        }

        self.applied.extend_from_slice(edits);
        self.final_content = Some(result.content);
        Ok(())
    }

    fn show_highlight(&mut self, ranges: &[DocumentRange]) -> HighlightId {
        if let Some(previous) = self.live_highlight {
            tracing::warn!(?previous, "highlight shown while another is live");
        }
        let id = HighlightId(self.next_highlight);
        self.next_highlight += 1;
        self.live_highlight = Some(id);

        let mut stderr = std::io::stderr().lock();
        for range in ranges {
            let _ = writeln!(
                stderr,
                "{}:{}:{}-{}:{}",
                self.document.path.display(),
                range.start.line + 1,
                range.start.character + 1,
                range.end.line + 1,
                range.end.character + 1,
            );
        }
        id
    }

    fn dispose_highlight(&mut self, handle: HighlightId) {
        if self.live_highlight == Some(handle) {
            self.live_highlight = None;
        }
        tracing::debug!(?handle, "highlight disposed");
    }

    fn prompt_confirmation(&mut self, message: &str, choices: &[&str]) -> Option<String> {
        match &mut self.confirmation {
            Confirmation::AssumeYes => choices.first().map(|c| c.to_string()),
            Confirmation::AssumeNo => None,
            Confirmation::Ask(reader) => Self::ask(reader.as_mut(), message, choices),
        }
    }

    fn config_flag(&self, flag: ConfigFlag) -> Option<String> {
        self.settings.flag(flag).map(str::to_string)
    }

    fn show_message(&mut self, severity: Severity, message: &str) {
        self.messages.push(HostMessage {
            severity,
            text: message.to_string(),
        });
    }
}
