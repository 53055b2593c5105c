// Shared by every bench target in this directory; not all of them use every
// helper.
#![allow(dead_code)]

use sql_executor_engine::{Batch, Point, Range, Script, StatementNode};

/// Lines taken by one generated procedure-like block.
pub const LINES_PER_BLOCK: usize = 12;

fn span(start: (usize, usize), end: (usize, usize)) -> Range {
    Range::new(Point::new(start.0, start.1), Point::new(end.0, end.1))
}

/// A script of `batches` batches, each holding `blocks` blocks shaped like
///
/// ```sql
/// BEGIN
///     SELECT 1;
///     IF @x = 1
///     BEGIN
///         UPDATE t SET a = 1;
///         WHILE @i < 10
///             SET @i += 1;
///     END
///     ELSE
///         PRINT 'no';
/// END
///
/// ```
pub fn generate_script(batches: usize, blocks: usize) -> Script {
    let mut line = 1;
    let mut out = Vec::with_capacity(batches);

    for _ in 0..batches {
        let mut statements = Vec::with_capacity(blocks);
        for _ in 0..blocks {
            statements.push(generate_block(line));
            line += LINES_PER_BLOCK;
        }
        out.push(Batch::new(statements));
        // separator line
        line += 1;
    }

    Script::new(out)
}

fn generate_block(first: usize) -> StatementNode {
    let l = |n: usize| first + n;
    let looping = StatementNode::looping(
        span((l(5), 8), (l(6), 24)),
        StatementNode::simple(span((l(6), 12), (l(6), 24))),
    );
    let inner = StatementNode::block(
        span((l(3), 4), (l(7), 7)),
        vec![StatementNode::simple(span((l(4), 8), (l(4), 27))), looping],
    );
    let conditional = StatementNode::conditional(
        span((l(2), 4), (l(9), 19)),
        Some(inner),
        Some(StatementNode::simple(span((l(9), 8), (l(9), 19)))),
    );

    StatementNode::block(
        span((l(0), 0), (l(10), 3)),
        vec![
            StatementNode::simple(span((l(1), 4), (l(1), 13))),
            conditional,
        ],
    )
}

/// Script text with roughly `blocks` statements per batch, for host-side
/// benchmarks.
pub fn generate_text(batches: usize, blocks: usize) -> String {
    let block = "BEGIN\n    SELECT 1;\n    IF @x = 1\n    BEGIN\n        UPDATE t SET a = 1;\n        WHILE @i < 10\n            SET @i += 1;\n    END\n    ELSE\n        PRINT 'no';\nEND\n\n";
    let batch = block.repeat(blocks);
    let mut text = String::with_capacity((batch.len() + 3) * batches);
    for _ in 0..batches {
        text.push_str(&batch);
        text.push_str("GO\n");
    }
    text
}
