/*!
 * # Selection Session
 *
 * Runs the statement under the caret instead of the whole script:
 *
 * 1. Bail out if the execute command is unavailable.
 * 2. If the user already selected something, execute that and stop.
 * 3. Parse the document. On any parse error execute the unmodified document
 *    so the host shows the syntax error where it really is.
 * 4. Locate the enclosing statement batch by batch.
 * 5. Snapshot the selection, select the statement, execute, restore.
 *
 * Step 5 is strictly ordered. The snapshot is taken before the selection is
 * touched and restored even when execution fails, so the user's caret ends up
 * exactly where it was.
 *
 * Nothing is kept between runs: each call gets its own parse tree, caret and
 * snapshot.
 */

mod host;


pub use host::{EditorHost, ExecutionGateway, HostError, ParseError, ParseResult, ScriptParser};

use std::borrow::Cow;
use std::fmt;

use crate::locator::{ScopeMode, locate_in_script};
use crate::position::{Point, Range, SelectionSnapshot};

/// What a run ended up doing. Only host failures are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The execute command was unavailable; nothing happened.
    GatewayUnavailable,
    /// The user's own selection was executed as-is.
    ExecutedExistingSelection,
    /// The script did not parse and was executed whole.
    ExecutedWholeScript { error_count: usize },
    /// The statement spanning `range` was selected, executed and the
    /// selection restored.
    ExecutedStatement { range: Range },
    /// The caret is not inside any statement; nothing happened.
    NoEnclosingStatement,
}

impl RunOutcome {
    pub fn executed(&self) -> bool {
        matches!(
            self,
            RunOutcome::ExecutedExistingSelection
                | RunOutcome::ExecutedWholeScript { .. }
                | RunOutcome::ExecutedStatement { .. }
        )
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::GatewayUnavailable => f.write_str("execute command unavailable"),
            RunOutcome::ExecutedExistingSelection => f.write_str("executed existing selection"),
            RunOutcome::ExecutedWholeScript { error_count } => {
                write!(f, "executed whole script ({error_count} parse errors)")
            }
            RunOutcome::ExecutedStatement { range } => write!(f, "executed statement {range}"),
            RunOutcome::NoEnclosingStatement => f.write_str("no statement at caret"),
        }
    }
}

/// Binds a parser and an execute command for locate-and-execute runs.
pub struct SelectionSession<'a, P: ?Sized, G: ?Sized> {
    parser: &'a P,
    gateway: &'a mut G,
}

impl<'a, P, G> SelectionSession<'a, P, G>
where
    P: ScriptParser + ?Sized,
    G: ExecutionGateway + ?Sized,
{
    pub fn new(parser: &'a P, gateway: &'a mut G) -> Self {
        Self { parser, gateway }
    }

    /// Execute the statement enclosing `cursor` in the host's document.
    ///
    /// With `has_existing_selection` the locator is skipped and the host's
    /// current selection is executed unchanged.
    pub fn run_statement_at<H: EditorHost>(
        &mut self,
        host: &mut H,
        cursor: Point,
        mode: ScopeMode,
        has_existing_selection: bool,
    ) -> Result<RunOutcome, HostError> {
        self.run(host, cursor, mode, has_existing_selection, None)
    }

    /// Entry point for an editor command bound to a key or menu item.
    ///
    /// The caret and whether anything is selected are read from the host, and
    /// that reading doubles as the snapshot restored after execution.
    pub fn run_at_caret<H: EditorHost>(
        &mut self,
        host: &mut H,
        mode: ScopeMode,
    ) -> Result<RunOutcome, HostError> {
        let current = host.selection();
        self.run(
            host,
            current.active,
            mode,
            !current.is_empty(),
            Some(current),
        )
    }

    fn run<H: EditorHost>(
        &mut self,
        host: &mut H,
        cursor: Point,
        mode: ScopeMode,
        has_existing_selection: bool,
        snapshot: Option<SelectionSnapshot>,
    ) -> Result<RunOutcome, HostError> {
        if !self.gateway.is_available() {
            log::warn!("execute command is not available, ignoring request");
            return Ok(RunOutcome::GatewayUnavailable);
        }

        if has_existing_selection {
            log::info!("executing existing selection");
            self.gateway.execute(&*host)?;
            return Ok(RunOutcome::ExecutedExistingSelection);
        }

        let parsed = self.parser.parse(&host.text());
        if !parsed.is_ok() {
            let error_count = parsed.error_count();
            log::warn!("script has {error_count} parse errors, executing it whole");
            for error in &parsed.errors {
                log::debug!("parse error at {error}");
            }
            self.gateway.execute(&WholeDocument(&*host))?;
            return Ok(RunOutcome::ExecutedWholeScript { error_count });
        }

        let Some(range) = locate_in_script(&parsed.script, cursor, mode) else {
            log::info!("caret {cursor} is not inside a statement ({mode} scope)");
            return Ok(RunOutcome::NoEnclosingStatement);
        };

        let snapshot = snapshot.unwrap_or_else(|| host.selection());
        host.set_selection(range)?;
        log::info!("executing statement {range} ({mode} scope)");
        let executed = self.gateway.execute(&*host);
        let restored = host.select(snapshot.anchor, snapshot.active);

        executed?;
        restored?;
        Ok(RunOutcome::ExecutedStatement { range })
    }
}

/// The host as an execute command sees it after a failed parse: the
/// selection collapsed onto the caret, so the whole document runs. The real
/// selection is never touched.
struct WholeDocument<'h>(&'h dyn EditorHost);

impl EditorHost for WholeDocument<'_> {
    fn text(&self) -> Cow<'_, str> {
        self.0.text()
    }

    fn selection(&self) -> SelectionSnapshot {
        SelectionSnapshot::caret(self.0.selection().active)
    }

    fn select(&mut self, anchor: Point, active: Point) -> Result<(), HostError> {
        Err(HostError::Selection {
            anchor,
            active,
            reason: "the document is being executed whole".to_string(),
        })
    }

    fn selected_text(&self) -> String {
        String::new()
    }
}
