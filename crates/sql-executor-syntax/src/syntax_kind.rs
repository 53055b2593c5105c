//! SyntaxKind enum for all tokens and nodes in the T-SQL statement tree.
//!
//! Tokens and nodes share a single enum. Every byte in the source appears as
//! a token somewhere in the tree.

/// All syntax kinds for the statement CST.
///
/// Token kinds come first so `is_token` is a single comparison.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Spaces and tabs
    WHITESPACE,
    /// LF, CRLF or a lone CR
    NEWLINE,
    /// `-- ...` up to the end of the line
    LINE_COMMENT,
    /// `/* ... */`, possibly nested
    BLOCK_COMMENT,
    /// `'...'` or `N'...'`
    STRING,
    /// `[...]` or `"..."`
    QUOTED_IDENT,
    NUMBER,
    /// Keywords, identifiers, `@variables` and `#temp` names
    WORD,
    SEMICOLON,
    L_PAREN,
    R_PAREN,
    COMMA,
    DOT,
    /// Any single-character operator
    OPERATOR,
    UNTERMINATED_STRING,
    UNTERMINATED_IDENT,
    UNTERMINATED_COMMENT,
    /// A character no other rule accepts
    UNKNOWN,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    SCRIPT,
    /// Statements between two separator lines
    BATCH,
    /// A separator line such as `GO` or `GO 5`
    SEPARATOR,
    /// A statement with no nested statements
    STATEMENT,
    /// `BEGIN ... END`
    BLOCK,
    /// `BEGIN TRY ... END TRY BEGIN CATCH ... END CATCH`
    TRY_CATCH,
    IF_STMT,
    /// The expression after `IF` or `WHILE`
    CONDITION,
    ELSE_CLAUSE,
    WHILE_STMT,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Whitespace, newlines and comments. The parser never sees these.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE
                | Self::NEWLINE
                | Self::LINE_COMMENT
                | Self::BLOCK_COMMENT
                | Self::UNTERMINATED_COMMENT
        )
    }

    /// Node kinds that become statements in the lowered tree.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::STATEMENT | Self::BLOCK | Self::TRY_CATCH | Self::IF_STMT | Self::WHILE_STMT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TsqlLang {}

impl rowan::Language for TsqlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: bounds checked above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TsqlLang>;
pub type SyntaxToken = rowan::SyntaxToken<TsqlLang>;
pub type SyntaxElement = rowan::SyntaxElement<TsqlLang>;
