//! Lowering the CST into the engine's statement tree.
//!
//! Only statement nodes survive. Conditions, separators and trivia are
//! dropped, and statements found inside ERROR nodes are hoisted into the
//! enclosing list so a caret inside them still finds something.

use sql_executor_engine::{Batch, Range, Script, StatementNode};

use crate::line_index::LineIndex;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Convert a SCRIPT node into a [`Script`].
pub fn lower(root: &SyntaxNode, index: &LineIndex<'_>) -> Script {
    let batches = root
        .children()
        .filter(|node| node.kind() == SyntaxKind::BATCH)
        .map(|batch| Batch::new(statements_in(&batch, index)))
        .collect();
    Script::new(batches)
}

fn statements_in(node: &SyntaxNode, index: &LineIndex<'_>) -> Vec<StatementNode> {
    let mut statements = Vec::new();
    for child in node.children() {
        if child.kind().is_statement() {
            statements.push(statement(&child, index));
        } else if child.kind() == SyntaxKind::ERROR {
            statements.extend(statements_in(&child, index));
        }
    }
    statements
}

fn first_statement(node: &SyntaxNode, index: &LineIndex<'_>) -> Option<StatementNode> {
    node.children()
        .find(|child| child.kind().is_statement())
        .map(|child| statement(&child, index))
}

fn span(node: &SyntaxNode, index: &LineIndex<'_>) -> Range {
    let range = node.text_range();
    Range::new(
        index.point(usize::from(range.start())),
        index.point(usize::from(range.end())),
    )
}

fn statement(node: &SyntaxNode, index: &LineIndex<'_>) -> StatementNode {
    let span = span(node, index);
    match node.kind() {
        SyntaxKind::BLOCK | SyntaxKind::TRY_CATCH => {
            StatementNode::block(span, statements_in(node, index))
        }
        SyntaxKind::IF_STMT => {
            let then_branch = first_statement(node, index);
            let else_branch = node
                .children()
                .find(|child| child.kind() == SyntaxKind::ELSE_CLAUSE)
                .and_then(|clause| first_statement(&clause, index));
            StatementNode::conditional(span, then_branch, else_branch)
        }
        SyntaxKind::WHILE_STMT => match first_statement(node, index) {
            Some(body) => StatementNode::looping(span, body),
            None => StatementNode::simple(span),
        },
        _ => StatementNode::simple(span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;
    use sql_executor_engine::Point;

    fn lowered(text: &str) -> Script {
        let tokens = lex(text);
        let (tree, _) = Parser::new(&tokens, "GO").parse();
        lower(&tree, &LineIndex::new(text))
    }

    fn range(start: (usize, usize), end: (usize, usize)) -> Range {
        Range::new(Point::new(start.0, start.1), Point::new(end.0, end.1))
    }

    #[test]
    fn spans_exclude_surrounding_trivia() {
        let script = lowered("  -- note\n  SELECT 1 ;  -- done\n");
        assert_eq!(
            script,
            Script::new(vec![Batch::new(vec![StatementNode::simple(range(
                (2, 2),
                (2, 12),
            ))])])
        );
    }

    #[test]
    fn lowers_every_statement_kind() {
        let text = "\
IF @a = 1
    PRINT 'one'
ELSE
BEGIN
    PRINT 'other'
END
WHILE @i < 3
    SET @i += 1
GO
BEGIN TRY
    SELECT 1
END TRY
BEGIN CATCH
    THROW
END CATCH";
        let expected = Script::new(vec![
            Batch::new(vec![
                StatementNode::conditional(
                    range((1, 0), (6, 3)),
                    Some(StatementNode::simple(range((2, 4), (2, 15)))),
                    Some(StatementNode::block(
                        range((4, 0), (6, 3)),
                        vec![StatementNode::simple(range((5, 4), (5, 17)))],
                    )),
                ),
                StatementNode::looping(
                    range((7, 0), (8, 15)),
                    StatementNode::simple(range((8, 4), (8, 15))),
                ),
            ]),
            Batch::new(vec![StatementNode::block(
                range((10, 0), (15, 9)),
                vec![
                    StatementNode::simple(range((11, 4), (11, 12))),
                    StatementNode::simple(range((14, 4), (14, 9))),
                ],
            )]),
        ]);

        let script = lowered(text);
        assert_eq!(script, expected);
        assert!(script.validate().is_ok());
    }

    #[test]
    fn if_without_statement_has_no_branches() {
        let script = lowered("IF @x = 1");
        assert_eq!(
            script.batches[0].statements,
            vec![StatementNode::conditional(
                range((1, 0), (1, 9)),
                None,
                None,
            )]
        );
    }

    #[test]
    fn while_without_body_is_simple() {
        let script = lowered("WHILE @x > 0");
        assert_eq!(
            script.batches[0].statements,
            vec![StatementNode::simple(range((1, 0), (1, 12)))]
        );
    }

    #[test]
    fn statements_in_stray_catch_are_kept() {
        let script = lowered("BEGIN CATCH\n  PRINT 1\nEND CATCH");
        assert_eq!(
            script.batches[0].statements,
            vec![StatementNode::simple(range((2, 2), (2, 9)))]
        );
    }

    #[test]
    fn empty_batches_are_kept() {
        let script = lowered("GO\nGO\n");
        assert_eq!(script.batches.len(), 3);
        assert!(script.is_empty());
    }
}
