//! # Parser - Event-Based Tree Construction
//!
//! Transforms a token stream into a syntax tree using the event-based
//! architecture from rust-analyzer.
//!
//! Grammar functions never build tree nodes themselves. They emit a flat
//! list of [`Event`]s, and the [`Sink`] turns that list into a Rowan tree
//! afterwards. This keeps partially parsed statements cheap to throw away
//! and keeps the grammar free of Rowan details.
//!
//! ## Significant Tokens Only
//!
//! The parser works on significant tokens. Whitespace and comments are
//! invisible to grammar rules, so `nth(1)` is always the next token that
//! means something. The one place where layout matters, batch separator
//! lines, is answered by [`Parser::at_line_start`] and
//! [`Parser::line_break_before`], which look at the
//! trivia between two significant tokens.
//!
//! ## The Marker System
//!
//! `parser.start()` returns a [`Marker`] that must be either completed with
//! a node kind or abandoned. Dropping it otherwise panics, which catches
//! grammar bugs before they produce a corrupt tree.
//!
//! ```ignore
//! let m = p.start();
//! p.bump();
//! m.complete(p, SyntaxKind::STATEMENT);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use thiserror::Error;

use crate::lexer::Token;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// A problem found while lexing or parsing, at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (byte {offset})")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// The parser state machine.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_kw()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
/// - Report problems: `error()`, `error_at()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    /// Indices into `tokens` of every non-trivia token.
    significant: Vec<usize>,
    pos: usize,
    events: Vec<Event>,
    errors: Vec<SyntaxError>,
    separator: &'t str,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a parser that splits batches on `separator` lines.
    pub fn new(tokens: &'t [Token<'input>], separator: &'t str) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();

        Self {
            tokens,
            significant,
            pos: 0,
            events: Vec::new(),
            errors: Vec::new(),
            separator,
        }
    }

    /// Parse the tokens into a SCRIPT tree plus the errors found.
    pub fn parse(mut self) -> (SyntaxNode, Vec<SyntaxError>) {
        grammar::script(&mut self);
        let tree = Sink::new(self.tokens, self.events).finish();
        (tree, self.errors)
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    fn token(&self, n: usize) -> Option<&Token<'input>> {
        self.significant
            .get(self.pos + n)
            .map(|&index| &self.tokens[index])
    }

    /// Current token kind, or EOF if past the end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n significant tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.token(n).map_or(SyntaxKind::EOF, |t| t.kind)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.significant.len()
    }

    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Text of the nth significant token ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.token(n).map_or("", |t| t.text)
    }

    /// Whether the nth token ahead is the word `kw`, ignoring case.
    pub fn nth_kw(&self, n: usize, kw: &str) -> bool {
        self.nth(n) == SyntaxKind::WORD && self.nth_text(n).eq_ignore_ascii_case(kw)
    }

    pub fn at_kw(&self, kw: &str) -> bool {
        self.nth_kw(0, kw)
    }

    pub fn nth_any_kw(&self, n: usize, kws: &[&str]) -> bool {
        kws.iter().any(|kw| self.nth_kw(n, kw))
    }

    /// The significant token just consumed, if any.
    pub fn prev(&self) -> Option<&Token<'input>> {
        let index = self.pos.checked_sub(1)?;
        self.significant.get(index).map(|&i| &self.tokens[i])
    }

    pub fn prev_kind(&self) -> SyntaxKind {
        self.prev().map_or(SyntaxKind::EOF, |t| t.kind)
    }

    pub fn prev_kw(&self, kws: &[&str]) -> bool {
        self.prev().is_some_and(|t| {
            t.kind == SyntaxKind::WORD && kws.iter().any(|kw| t.text.eq_ignore_ascii_case(kw))
        })
    }

    /// The trivia tokens in front of the nth significant token ahead, and
    /// whether a significant token precedes them. `None` past the end.
    fn trivia_before(&self, n: usize) -> Option<(&'t [Token<'input>], bool)> {
        let index = self.pos + n;
        let &token = self.significant.get(index)?;
        let tokens = self.tokens;
        match index.checked_sub(1).and_then(|i| self.significant.get(i)) {
            Some(&previous) => Some((&tokens[previous + 1..token], true)),
            None => Some((&tokens[..token], false)),
        }
    }

    /// Whether the nth significant token ahead is the first thing on its
    /// line: only whitespace sits between it and the last line break.
    ///
    /// A comment in front of it, even one spanning lines, does not count as
    /// a line start. The end of input does.
    pub fn at_line_start(&self, n: usize) -> bool {
        let Some((trivia, after_token)) = self.trivia_before(n) else {
            return true;
        };
        let rest = match trivia.iter().rposition(|t| t.kind == SyntaxKind::NEWLINE) {
            Some(newline) => &trivia[newline + 1..],
            None if after_token => return false,
            None => trivia,
        };
        rest.iter().all(|t| t.kind == SyntaxKind::WHITESPACE)
    }

    /// Whether a line break separates the nth significant token ahead from
    /// the token before it, so nothing else shares the earlier token's line.
    /// The end of input counts.
    pub fn line_break_before(&self, n: usize) -> bool {
        let Some((trivia, after_token)) = self.trivia_before(n) else {
            return true;
        };
        !after_token
            || trivia
                .iter()
                .any(|t| t.text.contains('\n') || t.text.contains('\r'))
    }

    /// Whether the current token starts a batch separator line: the
    /// separator keyword alone on its line, optionally followed by a repeat
    /// count.
    pub fn at_separator(&self) -> bool {
        if !self.at_kw(self.separator) || !self.at_line_start(0) {
            return false;
        }
        self.line_break_before(1)
            || (self.nth(1) == SyntaxKind::NUMBER && self.line_break_before(2))
    }

    /// Byte offset of the current token, or of the end of input.
    pub fn current_offset(&self) -> usize {
        match self.token(0) {
            Some(token) => token.offset,
            None => self.tokens.last().map_or(0, Token::end),
        }
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Report an error at the current token.
    pub fn error(&mut self, message: impl Into<String>) {
        let offset = self.current_offset();
        self.error_at(offset, message);
    }

    pub fn error_at(&mut self, offset: usize, message: impl Into<String>) {
        self.errors.push(SyntaxError::new(message, offset));
    }
}

/// A marker for a node being constructed.
///
/// `#[must_use]` and the `Drop` impl together enforce that every marker is
/// either completed (the placeholder becomes a `Start` and a `Finish` is
/// pushed) or abandoned (the placeholder is removed or left inert).
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    pos: usize,
    completed: bool,
}

impl Marker {
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
    }

    /// Drop the node. Tokens consumed since `start()` stay in the parent.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}
