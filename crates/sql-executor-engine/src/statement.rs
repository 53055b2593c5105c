//! Parsed statement tree handed to the locator.
//!
//! A [`Script`] is produced once per locate operation by a
//! [`ScriptParser`](crate::session::ScriptParser) and discarded afterwards.
//! Children are owned by their parent; there are no back references.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::position::Range;

/// A single statement and, for composite kinds, its nested statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementNode {
    /// A statement with no nested statements.
    Simple { span: Range },
    /// A `BEGIN ... END` style grouping.
    Block {
        span: Range,
        children: Vec<StatementNode>,
    },
    /// An `IF ... ELSE ...` construct. Either branch may be missing.
    Conditional {
        span: Range,
        then_branch: Option<Box<StatementNode>>,
        else_branch: Option<Box<StatementNode>>,
    },
    /// A `WHILE` loop with exactly one body statement.
    Loop {
        span: Range,
        body: Box<StatementNode>,
    },
}

/// Variant tag of a [`StatementNode`], for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Simple,
    Block,
    Conditional,
    Loop,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Simple => "simple",
            StatementKind::Block => "block",
            StatementKind::Conditional => "conditional",
            StatementKind::Loop => "loop",
        };
        f.write_str(name)
    }
}

impl StatementNode {
    pub fn simple(span: Range) -> Self {
        StatementNode::Simple { span }
    }

    pub fn block(span: Range, children: Vec<StatementNode>) -> Self {
        StatementNode::Block { span, children }
    }

    pub fn conditional(
        span: Range,
        then_branch: Option<StatementNode>,
        else_branch: Option<StatementNode>,
    ) -> Self {
        StatementNode::Conditional {
            span,
            then_branch: then_branch.map(Box::new),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn looping(span: Range, body: StatementNode) -> Self {
        StatementNode::Loop {
            span,
            body: Box::new(body),
        }
    }

    /// The statement's own span, first token through last token.
    pub fn span(&self) -> Range {
        match self {
            StatementNode::Simple { span }
            | StatementNode::Block { span, .. }
            | StatementNode::Conditional { span, .. }
            | StatementNode::Loop { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> StatementKind {
        match self {
            StatementNode::Simple { .. } => StatementKind::Simple,
            StatementNode::Block { .. } => StatementKind::Block,
            StatementNode::Conditional { .. } => StatementKind::Conditional,
            StatementNode::Loop { .. } => StatementKind::Loop,
        }
    }

    /// Immediate nested statements in declaration order.
    ///
    /// Absent conditional branches are skipped. Does not recurse.
    pub fn children(&self) -> Vec<&StatementNode> {
        match self {
            StatementNode::Simple { .. } => Vec::new(),
            StatementNode::Block { children, .. } => children.iter().collect(),
            StatementNode::Conditional {
                then_branch,
                else_branch,
                ..
            } => then_branch
                .iter()
                .chain(else_branch.iter())
                .map(|branch| &**branch)
                .collect(),
            StatementNode::Loop { body, .. } => vec![&**body],
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, StatementNode::Simple { .. })
    }
}

/// Top-level statements between two batch separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub statements: Vec<StatementNode>,
}

impl Batch {
    pub fn new(statements: Vec<StatementNode>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{kind} statement at {child} escapes its parent span {parent}")]
    ChildOutsideParent {
        kind: StatementKind,
        parent: Range,
        child: Range,
    },

    #[error("sibling statements overlap: {first} and {second}")]
    SiblingsOverlap { first: Range, second: Range },
}

/// A whole parsed script: batches in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    pub batches: Vec<Batch>,
}

impl Script {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self { batches }
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.statements.is_empty())
    }

    /// Every statement in the script, parents before their children.
    pub fn statements(&self) -> impl Iterator<Item = &StatementNode> + '_ {
        let mut stack: Vec<&StatementNode> = self
            .batches
            .iter()
            .rev()
            .flat_map(|b| b.statements.iter().rev())
            .collect();

        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().into_iter().rev());
            Some(node)
        })
    }

    /// Check the structural invariants the locator relies on.
    ///
    /// Every child span lies within its parent's span and no two siblings
    /// overlap, so the first match in source order is the only match.
    pub fn validate(&self) -> Result<(), TreeError> {
        for batch in &self.batches {
            check_siblings(batch.statements.iter())?;
            for statement in &batch.statements {
                validate_node(statement)?;
            }
        }
        Ok(())
    }
}

fn validate_node(node: &StatementNode) -> Result<(), TreeError> {
    let parent = node.span();
    let children = node.children();

    for child in &children {
        if !parent.contains_range(&child.span()) {
            return Err(TreeError::ChildOutsideParent {
                kind: child.kind(),
                parent,
                child: child.span(),
            });
        }
    }
    check_siblings(children.iter().copied())?;

    children.into_iter().try_for_each(validate_node)
}

fn check_siblings<'a>(siblings: impl Iterator<Item = &'a StatementNode>) -> Result<(), TreeError> {
    let mut previous: Option<Range> = None;
    for node in siblings {
        let span = node.span();
        if let Some(prev) = previous
            && (prev.overlaps(&span) || span.start < prev.start)
        {
            return Err(TreeError::SiblingsOverlap {
                first: prev,
                second: span,
            });
        }
        previous = Some(span);
    }
    Ok(())
}
