//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree
//! building. The parser emits a flat sequence of them instead of building
//! the tree directly:
//!
//! ```text
//! Start(STATEMENT)   <- begin a STATEMENT node
//!   Token(WORD)      <- SELECT
//!   Token(NUMBER)    <- 1
//!   Token(SEMICOLON)
//! Finish             <- end the STATEMENT node
//! ```
//!
//! Only significant tokens appear as events. The [`Sink`](super::sink::Sink)
//! weaves whitespace and comments back in while building the tree.

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add the next significant token to the current node.
    Token { kind: SyntaxKind },

    /// Finish the current node. Paired with a preceding `Start`.
    Finish,

    /// Pushed by `parser.start()` and replaced by `Start` when the marker
    /// completes. An abandoned placeholder is ignored by the Sink.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
