//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at_kw()`, `p.nth_kw()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! This is a statement-structure grammar, not a SQL grammar. It only
//! decides where statements start and end and how `BEGIN`/`IF`/`WHILE`
//! nest; everything inside a simple statement is consumed as-is.
//!
//! ## Module Structure
//!
//! - this module: script, batches, separators and statement dispatch
//! - [`compound`]: `BEGIN ... END`, `TRY ... CATCH`, `IF`, `WHILE`
//! - [`simple`]: where a simple statement ends
//!
//! ## Error Recovery
//!
//! Rules never give up. Unexpected tokens are wrapped in an ERROR node or
//! consumed into the current statement and an error is recorded, so the
//! tree always covers every byte of the input.

mod compound;
mod simple;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Words that start a statement wherever they appear at parenthesis depth 0,
/// unless the current statement can absorb them.
const STATEMENT_KEYWORDS: &[&str] = &[
    "ALTER",
    "BACKUP",
    "BEGIN",
    "BREAK",
    "BULK",
    "CHECKPOINT",
    "CLOSE",
    "COMMIT",
    "CONTINUE",
    "CREATE",
    "DBCC",
    "DEALLOCATE",
    "DECLARE",
    "DELETE",
    "DENY",
    "DROP",
    "EXEC",
    "EXECUTE",
    "FETCH",
    "GOTO",
    "GRANT",
    "IF",
    "INSERT",
    "MERGE",
    "OPEN",
    "PRINT",
    "RAISERROR",
    "READTEXT",
    "RECONFIGURE",
    "RESTORE",
    "RETURN",
    "REVERT",
    "REVOKE",
    "ROLLBACK",
    "SELECT",
    "SET",
    "SHUTDOWN",
    "THROW",
    "TRUNCATE",
    "UPDATE",
    "UPDATETEXT",
    "USE",
    "WAITFOR",
    "WHILE",
    "WRITETEXT",
];

/// Words after `BEGIN` that make it a simple statement rather than a block.
const BEGIN_SIMPLE: &[&str] = &[
    "TRAN",
    "TRANSACTION",
    "DISTRIBUTED",
    "DIALOG",
    "CONVERSATION",
];

/// Parse the whole script: batches separated by separator lines.
pub fn script(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        batch(p);
        if !p.at_separator() {
            break;
        }
        separator(p);
    }

    m.complete(p, SyntaxKind::SCRIPT);
}

fn batch(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at_end() && !p.at_separator() {
        statement_or_stray(p);
    }
    m.complete(p, SyntaxKind::BATCH);
}

fn separator(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::NUMBER) && !p.line_break_before(0) {
        p.bump();
    }
    m.complete(p, SyntaxKind::SEPARATOR);
}

/// Whether the current token begins a new statement.
///
/// Used both to end the previous statement and to end an `IF`/`WHILE`
/// condition. Keywords right after `.`, `,` or `AS` are names, not
/// statements (`t.open`, `a, close`, `AS [update]`).
pub(crate) fn at_statement_start(p: &Parser<'_, '_>) -> bool {
    if p.current() != SyntaxKind::WORD {
        return false;
    }
    if matches!(p.prev_kind(), SyntaxKind::DOT | SyntaxKind::COMMA) || p.prev_kw(&["AS"]) {
        return false;
    }

    if p.at_kw("WITH") {
        return at_cte_start(p);
    }
    if p.at_kw("UPDATE") {
        // `UPDATE(column)` in a trigger condition is a function call.
        return p.nth(1) != SyntaxKind::L_PAREN;
    }
    if p.at_kw("SAVE") {
        return p.nth_any_kw(1, &["TRAN", "TRANSACTION"]);
    }
    if p.at_kw("ENABLE") || p.at_kw("DISABLE") {
        return p.nth_kw(1, "TRIGGER");
    }
    if p.at_kw("END") {
        return p.nth_kw(1, "CONVERSATION");
    }
    p.nth_any_kw(0, STATEMENT_KEYWORDS)
}

/// `WITH name AS (`, `WITH name (columns) AS (` or `WITH XMLNAMESPACES`.
///
/// Anything else after `WITH` is a table hint or an option list.
pub(crate) fn at_cte_start(p: &Parser<'_, '_>) -> bool {
    if !p.at_kw("WITH") {
        return false;
    }
    if p.nth_kw(1, "XMLNAMESPACES") {
        return true;
    }
    let named = matches!(p.nth(1), SyntaxKind::WORD | SyntaxKind::QUOTED_IDENT);
    named
        && (p.nth(2) == SyntaxKind::L_PAREN
            || (p.nth_kw(2, "AS") && p.nth(3) == SyntaxKind::L_PAREN))
}

/// `END` that closes a plain `BEGIN ... END` block.
pub(crate) fn at_block_end(p: &Parser<'_, '_>) -> bool {
    p.at_kw("END") && !p.nth_any_kw(1, &["TRY", "CATCH", "CONVERSATION"])
}

/// Whether a statement can start here, for the bodies of `IF`, `ELSE` and
/// `WHILE`.
pub(crate) fn can_start_statement(p: &Parser<'_, '_>) -> bool {
    if p.at_end() || p.at_separator() {
        return false;
    }
    if p.at(SyntaxKind::SEMICOLON) || p.at(SyntaxKind::R_PAREN) || p.at_kw("ELSE") {
        return false;
    }
    !p.at_kw("END") || p.nth_kw(1, "CONVERSATION")
}

/// Parse one statement. The caller has checked one can start here.
pub(crate) fn statement(p: &mut Parser<'_, '_>) {
    if p.at_kw("BEGIN") {
        if p.nth_kw(1, "TRY") {
            compound::try_catch(p);
        } else if p.nth_kw(1, "CATCH") {
            compound::stray_catch(p);
        } else if p.nth_any_kw(1, BEGIN_SIMPLE) {
            simple::simple_statement(p);
        } else {
            compound::block(p);
        }
    } else if p.at_kw("IF") {
        compound::if_statement(p);
    } else if p.at_kw("WHILE") {
        compound::while_statement(p);
    } else {
        simple::simple_statement(p);
    }
}

/// Parse a statement, or recover from a token that cannot start one.
///
/// A lone `;` is an empty statement and stays in the parent without a node.
pub(crate) fn statement_or_stray(p: &mut Parser<'_, '_>) {
    if p.at(SyntaxKind::SEMICOLON) {
        p.bump();
    } else if p.at_kw("END") && !p.nth_kw(1, "CONVERSATION") {
        let m = p.start();
        p.error("END without matching BEGIN");
        p.bump();
        if p.at_kw("TRY") || p.at_kw("CATCH") {
            p.bump();
        }
        m.complete(p, SyntaxKind::ERROR);
    } else if p.at_kw("ELSE") {
        let m = p.start();
        p.error("ELSE without matching IF");
        p.bump();
        m.complete(p, SyntaxKind::ERROR);
    } else if p.at(SyntaxKind::R_PAREN) {
        let m = p.start();
        p.error("unbalanced parentheses: unexpected ')'");
        p.bump();
        m.complete(p, SyntaxKind::ERROR);
    } else {
        statement(p);
    }
}

/// Consume the contents of parentheses and `CASE ... END` while checking
/// balance. Shared by simple statements and conditions.
#[derive(Debug, Default)]
pub(crate) struct Nesting {
    /// Byte offsets of the `(` still open.
    open_parens: Vec<usize>,
    case_depth: usize,
}

impl Nesting {
    /// At parenthesis depth 0, where statement keywords count.
    pub(crate) fn at_top(&self) -> bool {
        self.open_parens.is_empty()
    }

    /// Outside every `CASE`, where `END` and `ELSE` belong to blocks.
    pub(crate) fn outside_case(&self) -> bool {
        self.case_depth == 0
    }

    /// Record the current token, then consume it.
    pub(crate) fn bump(&mut self, p: &mut Parser<'_, '_>) {
        match p.current() {
            SyntaxKind::L_PAREN => self.open_parens.push(p.current_offset()),
            SyntaxKind::R_PAREN => {
                let opened = self.open_parens.pop();
                if opened.is_none() {
                    p.error("unbalanced parentheses: unexpected ')'");
                }
            }
            SyntaxKind::WORD if p.at_kw("CASE") => self.case_depth += 1,
            SyntaxKind::WORD if p.at_kw("END") && self.case_depth > 0 => self.case_depth -= 1,
            _ => {}
        }
        p.bump();
    }

    /// Report every `(` that was never closed.
    pub(crate) fn finish(self, p: &mut Parser<'_, '_>) {
        for offset in self.open_parens {
            p.error_at(offset, "unbalanced parentheses: missing ')'");
        }
    }
}

#[cfg(test)]
mod tests;
