//! Seams between the session and the editor hosting it.
//!
//! The session never talks to an editor directly. A host supplies the active
//! document through [`EditorHost`], the command that runs SQL through
//! [`ExecutionGateway`], and a [`ScriptParser`] that turns text into a
//! [`Script`]. All of them are called synchronously on the caller's thread.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::position::{Point, Range, SelectionSnapshot};
use crate::statement::Script;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("execute command failed: {0}")]
    Execution(String),

    #[error("failed to move selection to {anchor}..{active}: {reason}")]
    Selection {
        anchor: Point,
        active: Point,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The single active document of the host editor.
pub trait EditorHost {
    /// Full document text.
    fn text(&self) -> Cow<'_, str>;

    /// Current anchor and caret.
    fn selection(&self) -> SelectionSnapshot;

    /// Move the anchor and caret. `active` may come before `anchor`.
    fn select(&mut self, anchor: Point, active: Point) -> Result<(), HostError>;

    /// Text between anchor and caret; empty for a collapsed selection.
    fn selected_text(&self) -> String;

    /// Select `range` with the caret at its end.
    fn set_selection(&mut self, range: Range) -> Result<(), HostError> {
        self.select(range.start, range.end)
    }

    /// What an execute command runs: the selection, or the whole document
    /// when nothing is selected.
    fn execution_text(&self) -> String {
        if self.selection().is_empty() {
            self.text().into_owned()
        } else {
            self.selected_text()
        }
    }
}

/// The host command that runs whatever is currently selected.
pub trait ExecutionGateway {
    /// Whether the command can run right now (connected, not busy).
    fn is_available(&self) -> bool;

    fn execute(&mut self, host: &dyn EditorHost) -> Result<(), HostError>;
}

/// One syntax problem reported by a parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{at}: {message}")]
pub struct ParseError {
    pub message: String,
    pub at: Point,
}

impl ParseError {
    pub fn new(message: impl Into<String>, at: Point) -> Self {
        Self {
            message: message.into(),
            at,
        }
    }
}

/// A parsed script plus whatever errors were found on the way.
///
/// The tree is usable for display even when errors are present, but the
/// session treats any error as a failed parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub script: Script,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn new(script: Script, errors: Vec<ParseError>) -> Self {
        Self { script, errors }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "{} batches, no errors", self.script.batches.len());
        }
        write!(f, "{} errors", self.error_count())?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

/// Turns script text into a statement tree.
pub trait ScriptParser {
    fn parse(&self, text: &str) -> ParseResult;
}
