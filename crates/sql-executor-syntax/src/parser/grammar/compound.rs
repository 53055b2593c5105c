//! Statements that contain other statements.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::{
    Nesting, at_block_end, at_statement_start, can_start_statement, statement, statement_or_stray,
};

/// `BEGIN ... END`.
pub(super) fn block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let begin = p.current_offset();
    p.bump();

    loop {
        if p.at_end() || p.at_separator() {
            p.error_at(begin, "BEGIN without matching END");
            break;
        }
        if at_block_end(p) {
            p.bump();
            p.eat(SyntaxKind::SEMICOLON);
            break;
        }
        statement_or_stray(p);
    }

    m.complete(p, SyntaxKind::BLOCK);
}

/// `BEGIN TRY ... END TRY BEGIN CATCH ... END CATCH` as one node.
pub(super) fn try_catch(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let begin = p.current_offset();

    if !section(p, "TRY") {
        p.error_at(begin, "BEGIN TRY without matching END TRY");
        m.complete(p, SyntaxKind::TRY_CATCH);
        return;
    }

    if p.at_kw("BEGIN") && p.nth_kw(1, "CATCH") {
        let catch = p.current_offset();
        if !section(p, "CATCH") {
            p.error_at(catch, "BEGIN CATCH without matching END CATCH");
        }
    } else {
        p.error("END TRY must be followed by BEGIN CATCH");
    }

    m.complete(p, SyntaxKind::TRY_CATCH);
}

/// `BEGIN CATCH` with no `TRY` in front of it. Parsed like a catch section
/// so its `END CATCH` does not leak out.
pub(super) fn stray_catch(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.error("BEGIN CATCH without BEGIN TRY");
    section(p, "CATCH");
    m.complete(p, SyntaxKind::ERROR);
}

/// `BEGIN <word> ... END <word>`, returning whether the `END` was found.
fn section(p: &mut Parser<'_, '_>, word: &str) -> bool {
    p.bump();
    p.bump();

    loop {
        if p.at_end() || p.at_separator() {
            return false;
        }
        if p.at_kw("END") && p.nth_kw(1, word) {
            p.bump();
            p.bump();
            p.eat(SyntaxKind::SEMICOLON);
            return true;
        }
        statement_or_stray(p);
    }
}

/// `IF condition statement [ELSE statement]`.
pub(super) fn if_statement(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    condition(p, "IF");
    if can_start_statement(p) {
        statement(p);
    } else {
        p.error("IF without a statement");
    }

    if p.at_kw("ELSE") {
        let else_clause = p.start();
        p.bump();
        if can_start_statement(p) {
            statement(p);
        } else {
            p.error("ELSE without a statement");
        }
        else_clause.complete(p, SyntaxKind::ELSE_CLAUSE);
    }

    m.complete(p, SyntaxKind::IF_STMT);
}

/// `WHILE condition statement`.
pub(super) fn while_statement(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    condition(p, "WHILE");
    if can_start_statement(p) {
        statement(p);
    } else {
        p.error("WHILE without a statement");
    }

    m.complete(p, SyntaxKind::WHILE_STMT);
}

/// The boolean expression of an `IF` or `WHILE`.
///
/// It runs until the first token at parenthesis depth 0 that starts a
/// statement. Nothing marks the end of a condition in T-SQL, so a body that
/// does not start with a statement keyword is read as part of the
/// condition.
fn condition(p: &mut Parser<'_, '_>, owner: &str) {
    if !can_start_condition(p) {
        p.error(format!("{owner} without a condition"));
        return;
    }

    let m = p.start();
    let mut nesting = Nesting::default();
    loop {
        nesting.bump(p);

        if p.at_end() || p.at_separator() {
            break;
        }
        if nesting.at_top() {
            if p.at(SyntaxKind::SEMICOLON) || at_statement_start(p) {
                break;
            }
            if nesting.outside_case() && (p.at_kw("ELSE") || p.at_kw("END")) {
                break;
            }
        }
    }
    nesting.finish(p);
    m.complete(p, SyntaxKind::CONDITION);
}

fn can_start_condition(p: &Parser<'_, '_>) -> bool {
    can_start_statement(p) && !at_statement_start(p)
}
