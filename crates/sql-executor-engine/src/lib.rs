pub mod document;
pub mod locator;
pub mod position;
pub mod session;
pub mod statement;

// Re-export key types for easier usage
pub use document::Document;
pub use locator::{ScopeMode, UnknownScopeMode, locate, locate_in_script};
pub use position::{Point, Range, RangeError, SelectionSnapshot};
pub use session::{
    EditorHost, ExecutionGateway, HostError, ParseError, ParseResult, RunOutcome, ScriptParser,
    SelectionSession,
};
pub use statement::{Batch, Script, StatementKind, StatementNode, TreeError};
