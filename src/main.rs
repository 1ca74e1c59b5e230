//! Sheetline - A minimal multi-sheet spreadsheet for the command line

mod cli;
mod config;

use anyhow::{Context, Result, bail};
use cli::{Action, Cli};
use sheetline_core::Document;
use sheetline_core::storage::md::render_markdown;
use sheetline_engine::engine::{FormulaValue, format_number};
use std::env;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHEETLINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match cli::parse_args(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            return ExitCode::FAILURE;
        }
    };
    if cli.help {
        cli::print_usage();
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Apply every action in order. Returns false when a formula evaluated to
/// an error token.
fn run(cli: Cli) -> Result<bool> {
    let (layout, warnings) = if cli.no_config {
        (Default::default(), Vec::new())
    } else {
        config::load_layout(cli.config.as_deref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut doc = match &cli.file {
        Some(path) => Document::with_file(Some(path.clone()), layout)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => Document::new(layout),
    };

    let mut all_ok = true;
    let print_sheet = !cli.actions.iter().any(Action::produces_output);

    for action in cli.actions {
        debug!(?action, "applying");
        match action {
            Action::AddSheet(name) => {
                if doc.add_sheet(&name).is_none() {
                    bail!("Sheet name must not be blank");
                }
            }
            Action::SwitchSheet(target) => switch_sheet(&mut doc, &target)?,
            Action::Set { cell, text } => {
                if !doc.set_cell_from_input(cell, &text) {
                    bail!("Cell {} is outside the current sheet", cell);
                }
            }
            Action::Command(formula) => match doc.evaluate(&formula) {
                FormulaValue::Number(n) => println!("{}", format_number(n)),
                FormulaValue::Error(token) => {
                    println!("{}", token);
                    all_ok = false;
                }
            },
            Action::ExportMarkdown(path) => {
                doc.export_markdown(&path)?;
                println!("Exported to {}", path.display());
            }
            Action::ExportCsv(path) => {
                doc.export_csv(&path)?;
                println!("Exported to {}", path.display());
            }
            Action::Write => {
                let path = doc.save_file()?;
                eprintln!("Saved {}", path.display());
            }
        }
    }

    if print_sheet {
        print!("{}", render_markdown(&doc));
    }
    Ok(all_ok)
}

/// Switch by 1-based index when `target` is a number, else by name.
fn switch_sheet(doc: &mut Document, target: &str) -> Result<()> {
    if let Ok(index) = target.trim().parse::<usize>() {
        if index == 0 || !doc.switch_sheet(index - 1) {
            bail!(
                "Sheet index {} out of range (1..={})",
                index,
                doc.workbook.sheet_count()
            );
        }
        return Ok(());
    }
    doc.switch_sheet_by_name(target)?;
    Ok(())
}
