//! Command-line driver for the B-tree engine.
//!
//! Builds a tree from a degree and a list of keys, prints it, then applies
//! single-key inserts and deletes, printing the tree after each one.
//!
//! Usage:
//!   btree_cli --degree 3 10 20 5 6 12 30 7 17
//!   btree_cli --degree 2 1 2 3 4 --insert 5 --delete 2
//!   btree_cli --degree 3 --script < commands.txt
//!   btree_cli --degree 3 1 2 3 --format json
//!
//! Script commands, one per line: `insert <key>`, `delete <key>`, `show`, `quit`.
//! A malformed script line stops the run with a non-zero exit code.
//! Set RUST_LOG=debug to trace splits and merges on stderr.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use degree_btree::{BTree, DEFAULT_DEGREE};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Build a B-tree and show its structure after every change
#[derive(Parser, Debug)]
#[command(name = "btree_cli", version, about)]
struct Args {
    /// Minimum degree of the tree (t >= 2)
    #[arg(short = 't', long, default_value_t = DEFAULT_DEGREE)]
    degree: usize,

    /// Keys inserted in order to build the initial tree
    #[arg(value_name = "KEY", allow_negative_numbers = true)]
    keys: Vec<i64>,

    /// Key to insert after the initial build (repeatable)
    #[arg(short, long, value_name = "KEY", allow_negative_numbers = true)]
    insert: Vec<i64>,

    /// Key to delete after the inserts (repeatable)
    #[arg(short, long, value_name = "KEY", allow_negative_numbers = true)]
    delete: Vec<i64>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Read further commands from stdin
    #[arg(long)]
    script: bool,
}

/// How tree snapshots are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented `[ k1 k2 ]` lines
    Text,
    /// Nested JSON document
    Json,
}

/// A single script command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Insert(i64),
    Delete(i64),
    Show,
    Quit,
}

/// Parse one script line; blank lines and `#` comments yield `None`
fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next();
    if parts.next().is_some() {
        bail!("too many arguments in `{}`", line);
    }

    let key = |arg: Option<&str>| -> Result<i64> {
        let raw = arg.with_context(|| format!("`{}` needs a key", verb))?;
        raw.parse().with_context(|| format!("invalid key `{}`", raw))
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "insert" | "i" => Command::Insert(key(arg)?),
        "delete" | "d" => Command::Delete(key(arg)?),
        "show" | "s" => Command::Show,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command `{}`", other),
    };
    Ok(Some(command))
}

/// Print one snapshot of the tree
fn show<W: Write>(
    out: &mut W,
    tree: &BTree<i64>,
    format: OutputFormat,
    heading: &str,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "\n{}:", heading)?;
            write!(out, "{}", tree)?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", tree.export().to_json_pretty()?)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Apply one mutation and print the result
fn apply<W: Write>(
    out: &mut W,
    tree: &mut BTree<i64>,
    command: Command,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Command::Insert(key) => {
            if tree.insert(key) {
                show(out, tree, format, &format!("After inserting {}", key))?;
            } else {
                warn!(key, "key already present, tree unchanged");
                show(out, tree, format, &format!("{} already present", key))?;
            }
        }
        Command::Delete(key) => {
            if tree.delete(&key) {
                show(out, tree, format, &format!("After deleting {}", key))?;
            } else {
                warn!(key, "key not found, tree unchanged");
                show(out, tree, format, &format!("{} not found", key))?;
            }
        }
        Command::Show => show(out, tree, format, "Current tree")?,
        Command::Quit => {}
    }
    Ok(())
}

/// Run commands read from `input` until end of input or `quit`
///
/// Fails on the first malformed line without applying it or anything after it.
fn run_script<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    tree: &mut BTree<i64>,
    format: OutputFormat,
) -> Result<()> {
    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read command")?;
        match parse_command(&line).with_context(|| format!("line {}", number + 1))? {
            Some(Command::Quit) => break,
            Some(command) => apply(out, tree, command, format)?,
            None => {}
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut tree = BTree::new(args.degree)
        .with_context(|| format!("cannot build a tree of degree {}", args.degree))?;
    tree.extend(args.keys.iter().copied());
    debug!(
        degree = tree.degree(),
        keys = tree.len(),
        height = tree.height(),
        "initial tree built"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    show(&mut out, &tree, args.format, "B-tree structure after insertion")?;

    for key in args.insert {
        apply(&mut out, &mut tree, Command::Insert(key), args.format)?;
    }
    for key in args.delete {
        apply(&mut out, &mut tree, Command::Delete(key), args.format)?;
    }

    if args.script {
        run_script(io::stdin().lock(), &mut out, &mut tree, args.format)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("insert 5").unwrap(), Some(Command::Insert(5)));
        assert_eq!(parse_command("  d -3 ").unwrap(), Some(Command::Delete(-3)));
        assert_eq!(parse_command("SHOW").unwrap(), Some(Command::Show));
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("insert").is_err());
        assert!(parse_command("insert x").is_err());
        assert!(parse_command("insert 1 2").is_err());
        assert!(parse_command("frobnicate 1").is_err());
    }

    #[test]
    fn test_script_session() {
        let mut tree = BTree::from_keys(2, [10, 20, 5]).unwrap();
        let script = "insert 6\n# comment\n\ndelete 10\nquit\ninsert 99\n";
        let mut out = Vec::new();

        run_script(script.as_bytes(), &mut out, &mut tree, OutputFormat::Text).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("After inserting 6:\n[ 10 ]\n  [ 5 6 ]\n  [ 20 ]\n"));
        assert!(text.contains("After deleting 10:\n"));
        assert!(!text.contains("99"));
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![5, 6, 20]);
    }

    #[test]
    fn test_script_stops_at_invalid_key() {
        let mut tree = BTree::from_keys(2, [1, 2]).unwrap();
        let script = "insert 5\ninsert x\ninsert 3\n";
        let mut out = Vec::new();

        let err = run_script(script.as_bytes(), &mut out, &mut tree, OutputFormat::Text)
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.starts_with("line 2: "), "{}", message);
        assert!(message.contains("invalid key `x`"), "{}", message);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 5]);
    }

    #[test]
    fn test_script_rejects_unknown_command() {
        let mut tree = BTree::from_keys(2, [1]).unwrap();
        let mut out = Vec::new();

        let err = run_script("bogus\n".as_bytes(), &mut out, &mut tree, OutputFormat::Text)
            .unwrap_err();

        assert!(format!("{:#}", err).contains("unknown command `bogus`"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_json_output() {
        let tree = BTree::from_keys(2, [1, 2, 3, 4]).unwrap();
        let mut out = Vec::new();
        show(&mut out, &tree, OutputFormat::Json, "ignored").unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["keys"], serde_json::json!([2]));
        assert_eq!(value["children"][1]["keys"], serde_json::json!([3, 4]));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "btree_cli", "-t", "2", "3", "1", "--insert", "7", "-o", "json",
        ])
        .unwrap();
        assert_eq!(args.degree, 2);
        assert_eq!(args.keys, vec![3, 1]);
        assert_eq!(args.insert, vec![7]);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.script);
    }
}
