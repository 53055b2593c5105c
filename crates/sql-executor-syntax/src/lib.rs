//! # sql-executor-syntax
//!
//! A lossless T-SQL *statement-structure* tree using [Rowan] + [Logos],
//! following the [rust-analyzer] architecture model, and the default
//! [`ScriptParser`] for the engine.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What It Parses
//!
//! This is not a SQL grammar. It answers one question: where does each
//! statement start and end, and which statements sit inside `BEGIN ... END`,
//! `TRY ... CATCH`, `IF ... ELSE` and `WHILE`. Everything inside a simple
//! statement is kept as a flat run of tokens.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree → lower → Script
//!               (Logos)          (Grammar)        (GreenNodeBuilder)   (LineIndex)
//! ```
//!
//! - [`lexer`]: every byte becomes part of some token, nothing is discarded.
//! - [`parser`]: grammar rules over significant tokens emit events; the sink
//!   re-inserts trivia so statement nodes start and end on real tokens.
//! - [`lower`]: turns statement nodes into the engine's
//!   [`StatementNode`](sql_executor_engine::StatementNode) tree, converting
//!   byte ranges to line/character points with a [`LineIndex`].
//!
//! ## Module Structure
//!
//! ```text
//! sql-executor-syntax/
//! ├── lib.rs           # This file - public API
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── line_index.rs    # Byte offset → Point
//! ├── lower.rs         # CST → engine Script
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs      # Script, batches, statement dispatch
//!         ├── compound.rs # BEGIN/END, TRY/CATCH, IF, WHILE
//!         └── simple.rs   # Simple statement boundaries
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use sql_executor_syntax::{parse, SyntaxKind};
//!
//! let parse = parse("PRINT 1\nGO\n");
//!
//! // The tree preserves all text
//! assert_eq!(parse.syntax.text().to_string(), "PRINT 1\nGO\n");
//!
//! // Batches and separators are the root's children
//! let kinds: Vec<_> = parse.syntax.children().map(|n| n.kind()).collect();
//! assert_eq!(kinds, [SyntaxKind::BATCH, SyntaxKind::SEPARATOR, SyntaxKind::BATCH]);
//! assert!(parse.errors.is_empty());
//! ```

pub mod lexer;
pub mod line_index;
pub mod lower;
pub mod parser;
pub mod syntax_kind;

use sql_executor_engine::{ParseError, ParseResult, ScriptParser};

pub use line_index::LineIndex;
pub use parser::SyntaxError;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TsqlLang};

use lexer::{Token, lex};
use parser::Parser;

pub const DEFAULT_BATCH_SEPARATOR: &str = "GO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Keyword that, alone on a line, ends a batch. Compared ignoring case.
    pub batch_separator: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            batch_separator: DEFAULT_BATCH_SEPARATOR.to_string(),
        }
    }
}

/// A parsed script: the lossless tree and every problem found, ordered by
/// position.
#[derive(Debug, Clone)]
pub struct Parse {
    pub syntax: SyntaxNode,
    pub errors: Vec<SyntaxError>,
}

/// Parse with the default `GO` separator.
pub fn parse(text: &str) -> Parse {
    parse_with_options(text, &ParserOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParserOptions) -> Parse {
    let tokens = lex(text);
    let lexical = lexical_errors(&tokens);
    let (syntax, mut errors) = Parser::new(&tokens, &options.batch_separator).parse();

    errors.extend(lexical);
    errors.sort_by_key(|error| error.offset);
    Parse { syntax, errors }
}

fn lexical_errors(tokens: &[Token<'_>]) -> Vec<SyntaxError> {
    tokens
        .iter()
        .filter_map(|token| {
            let message = match token.kind {
                SyntaxKind::UNTERMINATED_STRING => "unterminated string literal",
                SyntaxKind::UNTERMINATED_IDENT => "unterminated quoted identifier",
                SyntaxKind::UNTERMINATED_COMMENT => "unterminated block comment",
                _ => return None,
            };
            Some(SyntaxError::new(message, token.offset))
        })
        .collect()
}

/// The default [`ScriptParser`]: T-SQL statement structure.
#[derive(Debug, Clone, Default)]
pub struct TsqlParser {
    options: ParserOptions,
}

impl TsqlParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl ScriptParser for TsqlParser {
    fn parse(&self, text: &str) -> ParseResult {
        let parse = parse_with_options(text, &self.options);
        let index = LineIndex::new(text);
        let script = lower::lower(&parse.syntax, &index);

        let errors: Vec<ParseError> = parse
            .errors
            .into_iter()
            .map(|error| ParseError::new(error.message, index.point(error.offset)))
            .collect();

        log::debug!(
            "parsed {} batches over {} lines with {} errors",
            script.batches.len(),
            index.line_count(),
            errors.len()
        );
        ParseResult::new(script, errors)
    }
}
