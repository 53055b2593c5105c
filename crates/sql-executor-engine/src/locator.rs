//! Finding the statement that encloses the caret.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::{Point, Range};
use crate::statement::{Script, StatementNode};

/// How far the locator descends into composite statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// Only the statements handed to the locator are candidates; a whole
    /// `BEGIN ... END` or `IF` is returned even when the caret sits on a
    /// nested statement.
    #[default]
    Block,
    /// The innermost statement containing the caret wins.
    Inner,
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeMode::Block => f.write_str("block"),
            ScopeMode::Inner => f.write_str("inner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scope mode '{0}', expected 'block' or 'inner'")]
pub struct UnknownScopeMode(pub String);

impl FromStr for ScopeMode {
    type Err = UnknownScopeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(ScopeMode::Block),
            "inner" => Ok(ScopeMode::Inner),
            _ => Err(UnknownScopeMode(s.to_string())),
        }
    }
}

/// Find the span of the statement containing `cursor`.
///
/// Statements are tried in order. Under [`ScopeMode::Inner`] the nested
/// statements of a composite are searched before the composite itself, so
/// the innermost match is returned. The result is always a statement's own
/// span, never a narrowed part of it.
pub fn locate<'a, I>(statements: I, cursor: Point, mode: ScopeMode) -> Option<Range>
where
    I: IntoIterator<Item = &'a StatementNode>,
{
    locate_at_depth(statements, cursor, mode, 0)
}

fn locate_at_depth<'a, I>(
    statements: I,
    cursor: Point,
    mode: ScopeMode,
    depth: usize,
) -> Option<Range>
where
    I: IntoIterator<Item = &'a StatementNode>,
{
    for statement in statements {
        if mode == ScopeMode::Inner && statement.is_composite() {
            let nested = statement.children();
            if let Some(found) = locate_at_depth(nested, cursor, mode, depth + 1) {
                return Some(found);
            }
        }

        let span = statement.span();
        if span.contains(cursor) {
            log::debug!(
                "caret {cursor} inside {} statement {span} at depth {depth}",
                statement.kind()
            );
            return Some(span);
        }
    }

    None
}

/// Search the batches of `script` in order and stop at the first match.
pub fn locate_in_script(script: &Script, cursor: Point, mode: ScopeMode) -> Option<Range> {
    script
        .batches
        .iter()
        .enumerate()
        .find_map(|(index, batch)| {
            let found = locate(&batch.statements, cursor, mode);
            if found.is_some() {
                log::debug!("caret {cursor} matched in batch {}", index + 1);
            }
            found
        })
}
