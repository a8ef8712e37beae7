// Supported file kinds
pub mod language;

// Script region extraction
pub mod region;

// Position tracking and translation
pub mod position;

// Syntax trees
pub mod syntax;

// Selection classification
pub mod classify;

// Print call location
pub mod locate;

// Document edit synthesis
pub mod synth;

// Byte-level edit engine
pub mod edit;

// File operations module
pub mod file;

// Settings
pub mod config;

// Environment primitives
pub mod host;

// File-backed host
pub mod file_host;

// Commands
pub mod commands;

// JSON output module
pub mod json;

// Logging setup
pub mod tracing_config;

// Re-exports
pub use classify::{LogTarget, Selection, classify, enclosing_function_name};
pub use commands::{
    Command, CommandError, CommandOutcome, Dispatcher, delete_console_logs, insert_console_log,
};
pub use config::{ConfigError, ConfigFlag, Settings};
pub use edit::{BatchResult, Edit, EditError, apply_edits, compute_checksum, verify_checksum};
pub use file::{FileContent, FileError, read_file};
pub use file_host::{Confirmation, FileHost, HighlightId, HostMessage};
pub use host::{ActiveDocument, Host, HostError, SelectionRange, Severity};
pub use json::{CommandReport, generate_execution_id};
pub use language::{FileKind, Grammar, detect_file_kind};
pub use locate::{PrintCallSpan, find_all};
pub use position::{
    DocumentPosition, DocumentRange, Position, PositionTranslator, byte_to_position,
    offset_to_position, position_to_offset,
};
pub use region::{EmbeddedRegion, ScriptText, extract_script};
pub use synth::DocumentEdit;
pub use syntax::{NodeKind, ParseError, SyntaxNode, SyntaxTree};
