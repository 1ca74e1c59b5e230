//! Command-line argument parsing.

use anyhow::{Context, Result, anyhow, bail};
use sheetline_core::CellRef;
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("Usage: sheetline [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Workbook file to open (.grd)");
    eprintln!();
    eprintln!("Options (applied in order):");
    eprintln!("  --add-sheet <NAME>        Append a sheet");
    eprintln!("  --sheet <NAME|INDEX>      Switch sheet (INDEX is 1-based)");
    eprintln!("  -s, --set <R,C=TEXT>      Set a cell on the current sheet (1-based)");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print the result");
    eprintln!("  -o, --output <FILE>       Export the current sheet to markdown");
    eprintln!("  --csv <FILE>              Export the current sheet to CSV");
    eprintln!("  -w, --write               Save the workbook back to FILE");
    eprintln!("  --config <FILE>           Read settings from FILE");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Without -c, -o or --csv the current sheet is printed as markdown.");
}

/// One step to apply to the document, in command-line order.
#[derive(Debug, PartialEq)]
pub enum Action {
    AddSheet(String),
    SwitchSheet(String),
    Set { cell: CellRef, text: String },
    Command(String),
    ExportMarkdown(PathBuf),
    ExportCsv(PathBuf),
    Write,
}

impl Action {
    /// Whether the action already produces output of its own.
    pub fn produces_output(&self) -> bool {
        matches!(
            self,
            Action::Command(_) | Action::ExportMarkdown(_) | Action::ExportCsv(_)
        )
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Cli {
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_config: bool,
    pub actions: Vec<Action>,
    pub help: bool,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = String>,
{
    let mut cli = Cli::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |what: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{} requires {}", arg, what))
        };
        match arg.as_str() {
            "-h" | "--help" => cli.help = true,
            "--add-sheet" => cli.actions.push(Action::AddSheet(value("a sheet name")?)),
            "--sheet" => cli.actions.push(Action::SwitchSheet(value("a sheet name or index")?)),
            "-s" | "--set" => {
                let spec = value("R,C=TEXT")?;
                cli.actions.push(parse_set(&spec)?);
            }
            "-c" | "--command" => cli.actions.push(Action::Command(value("a formula")?)),
            "-o" | "--output" => {
                cli.actions.push(Action::ExportMarkdown(PathBuf::from(value("a file path")?)))
            }
            "--csv" => cli.actions.push(Action::ExportCsv(PathBuf::from(value("a file path")?))),
            "-w" | "--write" => cli.actions.push(Action::Write),
            "--config" => cli.config = Some(PathBuf::from(value("a file path")?)),
            "--no-config" => cli.no_config = true,
            other if other.starts_with('-') && other.len() > 1 => {
                bail!("Unknown option: {}", other)
            }
            _ => {
                if cli.file.is_some() {
                    bail!("Unexpected argument: {}", arg);
                }
                cli.file = Some(PathBuf::from(arg));
            }
        }
    }

    if cli.file.is_none() && cli.actions.contains(&Action::Write) {
        bail!("--write requires a FILE argument");
    }
    Ok(cli)
}

/// Parse `R,C=TEXT` with a 1-based cell address.
fn parse_set(spec: &str) -> Result<Action> {
    let (address, text) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("--set expects R,C=TEXT, got '{}'", spec))?;
    let cell = CellRef::parse_pair(address)
        .with_context(|| format!("Invalid cell address '{}' (rows and columns start at 1)", address))?;
    Ok(Action::Set {
        cell,
        text: text.to_string(),
    })
}
