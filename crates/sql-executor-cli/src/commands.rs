//! The subcommands, writing to any `Write` so they can be tested.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sql_executor_engine::{
    Document, EditorHost, ExecutionGateway, HostError, ParseError, Point, Range, RunOutcome,
    ScopeMode, Script, ScriptParser, SelectionSession, StatementNode, locate_in_script,
};

/// "Executes" SQL by printing it, one block per execution.
pub struct PrintGateway<W> {
    out: W,
}

impl<W: Write> PrintGateway<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ExecutionGateway for PrintGateway<W> {
    fn is_available(&self) -> bool {
        true
    }

    fn execute(&mut self, host: &dyn EditorHost) -> Result<(), HostError> {
        writeln!(self.out, "{}", host.execution_text())?;
        self.out.flush()?;
        Ok(())
    }
}

fn load_document(file: &Path) -> Result<Document> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    Document::from_bytes(&bytes).with_context(|| format!("{} is not UTF-8", file.display()))
}

/// Place the caret (or the selection, with an anchor) and run the command.
pub fn run(
    parser: &dyn ScriptParser,
    file: &Path,
    caret: Point,
    anchor: Option<Point>,
    mode: ScopeMode,
    out: &mut dyn Write,
) -> Result<RunOutcome> {
    let mut doc = load_document(file)?;
    match anchor {
        Some(anchor) => doc.select(anchor, caret)?,
        None => doc.set_caret(caret),
    }

    let mut gateway = PrintGateway::new(out);
    let outcome = SelectionSession::new(parser, &mut gateway).run_at_caret(&mut doc, mode)?;

    if outcome.executed() {
        log::info!("{}: {outcome}", file.display());
    } else {
        log::warn!("{}: {outcome}", file.display());
    }
    Ok(outcome)
}

#[derive(Debug, Serialize)]
struct LocateReport {
    cursor: Point,
    scope: ScopeMode,
    range: Option<Range>,
    text: Option<String>,
    parse_errors: usize,
}

/// Print the span `locate_in_script` finds for the caret. The caret is used
/// as given, so one past the end of a line is not inside the line's last
/// statement.
pub fn locate(
    parser: &dyn ScriptParser,
    file: &Path,
    caret: Point,
    mode: ScopeMode,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let doc = load_document(file)?;
    let result = parser.parse(&doc.text());
    if !result.is_ok() {
        log::warn!(
            "{} has {} parse errors, locating in the partial tree",
            file.display(),
            result.error_count()
        );
    }

    let range = locate_in_script(&result.script, caret, mode);

    if json {
        let report = LocateReport {
            cursor: caret,
            scope: mode,
            range,
            text: range.map(|range| doc.slice(range).into_owned()),
            parse_errors: result.error_count(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        match range {
            Some(range) => writeln!(out, "{range}")?,
            None => writeln!(out, "no statement at {caret}")?,
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct OutlineReport<'a> {
    script: &'a Script,
    errors: Vec<ErrorReport<'a>>,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    message: &'a str,
    at: Point,
}

impl<'a> From<&'a ParseError> for ErrorReport<'a> {
    fn from(error: &'a ParseError) -> Self {
        Self {
            message: &error.message,
            at: error.at,
        }
    }
}

/// Print the statement tree of every batch and the parse errors.
pub fn outline(
    parser: &dyn ScriptParser,
    file: &Path,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let doc = load_document(file)?;
    let result = parser.parse(&doc.text());

    if json {
        let report = OutlineReport {
            script: &result.script,
            errors: result.errors.iter().map(ErrorReport::from).collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    for (index, batch) in result.script.batches.iter().enumerate() {
        writeln!(out, "batch {}", index + 1)?;
        for statement in &batch.statements {
            write_statement(out, statement, 1)?;
        }
    }
    if !result.is_ok() {
        writeln!(out, "{} parse errors", result.error_count())?;
        for error in &result.errors {
            writeln!(out, "  {error}")?;
        }
    }
    Ok(())
}

fn write_statement(out: &mut dyn Write, statement: &StatementNode, depth: usize) -> Result<()> {
    writeln!(
        out,
        "{}{} {}",
        "  ".repeat(depth),
        statement.kind(),
        statement.span()
    )?;
    for child in statement.children() {
        write_statement(out, child, depth + 1)?;
    }
    Ok(())
}
