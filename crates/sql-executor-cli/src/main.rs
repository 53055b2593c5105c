mod commands;

use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use sql_executor_config::Config;
use sql_executor_engine::{Point, ScopeMode};
use sql_executor_syntax::{ParserOptions, TsqlParser};

#[derive(Parser)]
#[command(
    name = "sql-executor",
    version,
    about = "Run the SQL statement under the cursor instead of the whole script"
)]
struct Cli {
    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of ~/.config/sql-executor/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text that would be executed for a caret or selection
    Run(RunArgs),

    /// Print the range of the statement enclosing a caret
    Locate(LocateArgs),

    /// Print the statement tree of every batch
    Outline(OutlineArgs),
}

#[derive(Args)]
struct CaretArgs {
    /// Caret line, starting at 1
    #[arg(long)]
    line: usize,

    /// Caret character offset within the line, starting at 0
    #[arg(long)]
    offset: usize,
}

impl CaretArgs {
    fn point(&self) -> Point {
        Point::new(self.line, self.offset)
    }
}

#[derive(Args)]
struct RunArgs {
    /// SQL script to run against
    file: PathBuf,

    #[command(flatten)]
    caret: CaretArgs,

    /// Line of the selection anchor, making the run use an existing selection
    #[arg(long, requires = "anchor_offset")]
    anchor_line: Option<usize>,

    #[arg(long, requires = "anchor_line")]
    anchor_offset: Option<usize>,

    /// block or inner; defaults to the config file's scope
    #[arg(long)]
    scope: Option<ScopeMode>,
}

#[derive(Args)]
struct LocateArgs {
    file: PathBuf,

    #[command(flatten)]
    caret: CaretArgs,

    #[arg(long)]
    scope: Option<ScopeMode>,

    /// Print a JSON report instead of the bare range
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OutlineArgs {
    file: PathBuf,

    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => Some(config),
            None => bail!("config file {} not found", path.display()),
        },
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

/// `-v` flags win, then `RUST_LOG`, then the config file, then `warn`.
fn init_logging(verbose: u8, config_level: Option<&str>) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {
            if std::env::var_os("RUST_LOG").is_none() {
                builder.parse_filters(config_level.unwrap_or("warn"));
            }
        }
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, config.log_level.as_deref());

    log::debug!(
        "scope {}, batch separator {:?}",
        config.scope,
        config.batch_separator
    );
    let parser = TsqlParser::new(ParserOptions {
        batch_separator: config.batch_separator.clone(),
    });
    let mut out = stdout().lock();

    match cli.command {
        Command::Run(args) => {
            let anchor = args
                .anchor_line
                .zip(args.anchor_offset)
                .map(|(line, offset)| Point::new(line, offset));
            commands::run(
                &parser,
                &args.file,
                args.caret.point(),
                anchor,
                args.scope.unwrap_or(config.scope),
                &mut out,
            )?;
        }
        Command::Locate(args) => commands::locate(
            &parser,
            &args.file,
            args.caret.point(),
            args.scope.unwrap_or(config.scope),
            args.json,
            &mut out,
        )?,
        Command::Outline(args) => commands::outline(&parser, &args.file, args.json, &mut out)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_anchor_and_scope() {
        let cli = Cli::try_parse_from([
            "sql-executor",
            "-vv",
            "run",
            "script.sql",
            "--line",
            "4",
            "--offset",
            "2",
            "--anchor-line",
            "3",
            "--anchor-offset",
            "0",
            "--scope",
            "Inner",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.caret.point(), Point::new(4, 2));
        assert_eq!(args.anchor_line.zip(args.anchor_offset), Some((3, 0)));
        assert_eq!(args.scope, Some(ScopeMode::Inner));
    }

    #[test]
    fn anchor_needs_both_coordinates() {
        let result = Cli::try_parse_from([
            "sql-executor",
            "run",
            "script.sql",
            "--line",
            "1",
            "--offset",
            "0",
            "--anchor-line",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_scope() {
        let result = Cli::try_parse_from([
            "sql-executor",
            "locate",
            "script.sql",
            "--line",
            "1",
            "--offset",
            "0",
            "--scope",
            "outer",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(load_config(Some(missing.as_path())).is_err());
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scope = \"inner\"\nbatch_separator = \"RUN\"\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.scope, ScopeMode::Inner);
        assert_eq!(config.batch_separator, "RUN");
    }
}
