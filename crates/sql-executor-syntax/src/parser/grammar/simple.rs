//! Where a simple statement ends.
//!
//! T-SQL does not need semicolons, so a statement normally ends where the
//! next one starts: the first statement keyword at parenthesis depth 0.
//! Several statements legitimately contain such keywords (`INSERT ...
//! SELECT`, `UNION ALL SELECT`, `UPDATE ... SET`, CTEs, `GRANT SELECT`),
//! and [`Statement::continues`] lists those.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::{Nesting, at_statement_start};

/// Objects whose `CREATE`/`ALTER` takes the rest of the batch as its body.
const MODULE_OBJECTS: &[&str] = &["PROC", "PROCEDURE", "FUNCTION", "TRIGGER", "VIEW"];

/// Words that may precede `IF EXISTS` in `DROP ... IF EXISTS`.
const DROPPABLE: &[&str] = &[
    "DROP",
    "TABLE",
    "VIEW",
    "PROCEDURE",
    "PROC",
    "FUNCTION",
    "INDEX",
    "DATABASE",
    "SCHEMA",
    "TRIGGER",
    "COLUMN",
    "CONSTRAINT",
    "TYPE",
    "USER",
    "ROLE",
    "SEQUENCE",
    "SYNONYM",
    "DEFAULT",
    "RULE",
    "ASSEMBLY",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ends at `;` or at the next statement keyword.
    Normal,
    /// `MERGE` has several `INSERT`/`UPDATE` clauses and must end with `;`.
    UntilSemicolon,
    /// Procedure, function, trigger and view definitions.
    ToBatchEnd,
}

/// What the statement parsed so far can still absorb.
#[derive(Debug)]
struct Statement {
    mode: Mode,
    /// `INSERT` waiting for its `SELECT`, `EXEC` or `VALUES`.
    insert_open: bool,
    /// `UPDATE` waiting for its `SET`.
    update_open: bool,
    /// `WITH` waiting for the statement that uses the CTEs.
    cte_open: bool,
    /// `GRANT`, `REVOKE` or `DENY` with a permission list.
    permissions: bool,
    /// `ALTER TABLE` and friends, which take `ADD`/`DROP`/`SET` actions.
    alter: bool,
    /// An `ALTER` that already has its action. Further actions start new
    /// statements.
    alter_acted: bool,
}

impl Statement {
    /// Look at the first word of the statement.
    fn begin(p: &Parser<'_, '_>) -> Self {
        let mut statement = Self {
            mode: Mode::Normal,
            insert_open: false,
            update_open: false,
            cte_open: false,
            permissions: false,
            alter: false,
            alter_acted: false,
        };

        if at_module_definition(p) {
            statement.mode = Mode::ToBatchEnd;
        } else if p.at_kw("MERGE") {
            statement.mode = Mode::UntilSemicolon;
        } else if p.at_kw("WITH") {
            statement.cte_open = true;
        } else if p.at_kw("INSERT") {
            statement.insert_open = true;
        } else if p.at_kw("UPDATE") {
            statement.update_open = !p.nth_kw(1, "STATISTICS");
        } else if p.nth_any_kw(0, &["GRANT", "REVOKE", "DENY"]) {
            statement.permissions = true;
        } else if p.at_kw("ALTER") {
            statement.alter = true;
        }

        statement
    }

    /// Whether the statement keyword at the current token belongs to this
    /// statement rather than starting the next one.
    fn continues(&self, p: &Parser<'_, '_>) -> bool {
        if self.permissions && p.prev_kw(&["GRANT", "REVOKE", "DENY"]) {
            return true;
        }

        if p.at_kw("SELECT") {
            return self.insert_open
                || self.cte_open
                || p.prev_kw(&["UNION", "EXCEPT", "INTERSECT", "ALL", "FOR"]);
        }
        if p.at_kw("INSERT") {
            return self.cte_open || p.prev_kw(&["BULK", "FOR"]);
        }
        if p.at_kw("UPDATE") || p.at_kw("DELETE") {
            return self.cte_open
                || p.prev_kw(&["FOR"])
                || (p.prev_kw(&["ON"]) && p.nth_any_kw(1, &["CASCADE", "NO", "SET"]));
        }
        if p.at_kw("MERGE") {
            return self.cte_open;
        }
        if p.at_kw("SET") {
            return self.update_open
                || self.altering()
                || (p.prev_kw(&["DELETE", "UPDATE"]) && p.nth_any_kw(1, &["NULL", "DEFAULT"]));
        }
        if p.at_kw("EXEC") || p.at_kw("EXECUTE") {
            return self.insert_open;
        }
        if p.at_kw("FETCH") {
            return p.prev_kw(&["ROWS", "ROW"]);
        }
        if p.at_kw("IF") {
            return p.nth_kw(1, "EXISTS") && p.prev_kw(DROPPABLE);
        }
        if p.at_kw("ALTER") {
            return self.altering() && p.nth_kw(1, "COLUMN");
        }
        if p.nth_any_kw(0, &["DROP", "ENABLE", "DISABLE"]) {
            return self.altering();
        }
        false
    }

    fn altering(&self) -> bool {
        self.alter && !self.alter_acted
    }

    /// Track the plain words that change what can follow.
    fn note(&mut self, p: &Parser<'_, '_>) {
        if p.at_kw("VALUES") {
            self.insert_open = false;
        } else if p.at_kw("ADD") && self.alter {
            self.alter_acted = true;
        }
    }

    /// Update the state for a statement keyword that [`continues`] accepted.
    ///
    /// [`continues`]: Statement::continues
    fn absorb(&mut self, p: &Parser<'_, '_>) {
        if self.alter {
            self.alter_acted = true;
        }
        if p.at_kw("SELECT") || p.at_kw("EXEC") || p.at_kw("EXECUTE") {
            self.insert_open = false;
            self.cte_open = false;
        } else if p.at_kw("INSERT") {
            self.insert_open = !p.prev_kw(&["BULK"]);
            self.cte_open = false;
        } else if p.at_kw("UPDATE") {
            self.update_open = self.cte_open;
            self.cte_open = false;
        } else if p.at_kw("DELETE") {
            self.cte_open = false;
        } else if p.at_kw("MERGE") {
            self.cte_open = false;
            self.mode = Mode::UntilSemicolon;
        } else if p.at_kw("SET") {
            self.update_open = false;
        }
    }
}

/// `CREATE [OR ALTER] PROCEDURE ...`, `ALTER VIEW ...` and the like.
fn at_module_definition(p: &Parser<'_, '_>) -> bool {
    if !p.at_kw("CREATE") && !p.at_kw("ALTER") {
        return false;
    }
    let object = if p.nth_kw(1, "OR") && p.nth_kw(2, "ALTER") {
        3
    } else {
        1
    };
    p.nth_any_kw(object, MODULE_OBJECTS)
}

/// Parse a statement with no nested statements.
pub(super) fn simple_statement(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut statement = Statement::begin(p);
    let mut nesting = Nesting::default();

    nesting.bump(p);
    loop {
        if p.at_end() || p.at_separator() {
            break;
        }

        if statement.mode != Mode::ToBatchEnd && nesting.at_top() {
            if p.at(SyntaxKind::SEMICOLON) {
                p.bump();
                break;
            }
            if nesting.outside_case()
                && (p.at_kw("ELSE") || (p.at_kw("END") && !p.nth_kw(1, "CONVERSATION")))
            {
                break;
            }
            if statement.mode == Mode::Normal && at_statement_start(p) {
                if !statement.continues(p) {
                    break;
                }
                statement.absorb(p);
            }
            statement.note(p);
        }

        nesting.bump(p);
    }

    nesting.finish(p);
    m.complete(p, SyntaxKind::STATEMENT);
}
