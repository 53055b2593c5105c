//! # Lexer - Tokenizing T-SQL Source
//!
//! The first stage of parsing: breaking script text into tokens with the
//! [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating the token texts gives back the original script:
//!
//! ```
//! use sql_executor_syntax::lexer::lex;
//!
//! let input = "SELECT 'it''s' -- done\nGO\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! The lexer knows nothing about statements. Keywords are plain `WORD`
//! tokens and the parser compares their text case-insensitively, because
//! almost every T-SQL keyword is also a valid identifier somewhere.
//!
//! Literals, quoted identifiers and comments are matched whole so that a
//! `;` or `END` inside them can never end a statement. Each has a separate
//! unterminated kind that runs to the end of the input; the parser reports
//! those as errors.

use logos::{Lexer, Logos};

use crate::syntax_kind::SyntaxKind;

/// Whether a delimited token found its closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closing {
    Closed,
    Unclosed,
}

/// Token kinds produced by the Logos lexer.
///
/// Separate from [`SyntaxKind`] because Logos needs to derive on it.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\x0B\x0C]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"--[^\r\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment(Closing),

    #[token("'", |lex| delimited(lex, b'\''))]
    #[regex("[nN]'", |lex| delimited(lex, b'\''))]
    StringLit(Closing),

    #[token("[", |lex| delimited(lex, b']'))]
    #[token("\"", |lex| delimited(lex, b'"'))]
    QuotedIdent(Closing),

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]*")]
    Number,

    #[regex(r"([a-zA-Z_@#]|[^\x00-\x7F])([a-zA-Z0-9_@#$]|[^\x00-\x7F])*")]
    Word,

    #[token(";")]
    Semicolon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[regex(r"[-+*/%=<>!&|^~:]")]
    Operator,
}

impl TokenKind {
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::LineComment => SyntaxKind::LINE_COMMENT,
            TokenKind::BlockComment(Closing::Closed) => SyntaxKind::BLOCK_COMMENT,
            TokenKind::BlockComment(Closing::Unclosed) => SyntaxKind::UNTERMINATED_COMMENT,
            TokenKind::StringLit(Closing::Closed) => SyntaxKind::STRING,
            TokenKind::StringLit(Closing::Unclosed) => SyntaxKind::UNTERMINATED_STRING,
            TokenKind::QuotedIdent(Closing::Closed) => SyntaxKind::QUOTED_IDENT,
            TokenKind::QuotedIdent(Closing::Unclosed) => SyntaxKind::UNTERMINATED_IDENT,
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::Word => SyntaxKind::WORD,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Operator => SyntaxKind::OPERATOR,
        }
    }
}

/// Consume up to and including `close`, where a doubled `close` is an
/// escaped delimiter (`''`, `]]`, `""`).
fn delimited(lex: &mut Lexer<'_, TokenKind>, close: u8) -> Closing {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        if rest[i] == close {
            if rest.get(i + 1) == Some(&close) {
                i += 2;
                continue;
            }
            lex.bump(i + 1);
            return Closing::Closed;
        }
        i += 1;
    }
    lex.bump(rest.len());
    Closing::Unclosed
}

/// Block comments nest in T-SQL: `/* a /* b */ still comment */`.
fn block_comment(lex: &mut Lexer<'_, TokenKind>) -> Closing {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        match (rest[i], rest.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return Closing::Closed;
                }
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    Closing::Unclosed
}

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Lex the input into a sequence of tokens.
///
/// Characters no rule accepts become `UNKNOWN` tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => SyntaxKind::UNKNOWN,
        };
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}
