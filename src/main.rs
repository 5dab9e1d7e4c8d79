//! Sheets - a sparse spreadsheet with a lazily evaluated formula engine

mod config;

use anyhow::{Context, bail};
use sheets_core::Sheet;
use sheets_core::storage::{write_markdown, write_markdown_file};
use sheets_formula::formula::{CellAddress, Value, format_value, parse_formula};
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Usage: sheets [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet to open (.json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print its value");
    eprintln!("  -s, --set <A1>=<TEXT>     Set a cell (can be repeated)");
    eprintln!("  --extend <ROWS>,<COLS>    Add rows and columns");
    eprintln!("  --shrink <ROWS>,<COLS>    Remove rows and columns");
    eprintln!("  -o, --output <FILE>       Export to markdown file");
    eprintln!("  -w, --write <FILE>        Save the sheet as JSON");
    eprintln!("  --config <FILE>           Read config from FILE");
    eprintln!("  -v, --verbose             Print invalidated cells after each edit");
    eprintln!("  -h, --help                Print help");
}

/// A change to apply to the sheet, in command-line order.
#[derive(Debug, PartialEq)]
enum Edit {
    Set(CellAddress, String),
    Extend(usize, usize),
    Shrink(usize, usize),
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    command: Option<String>,
    edits: Vec<Edit>,
    output_file: Option<PathBuf>,
    write_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    verbose: bool,
    help: bool,
}

fn parse_assignment(arg: &str) -> anyhow::Result<Edit> {
    let Some((cell, text)) = arg.split_once('=') else {
        bail!("--set expects <A1>=<TEXT>, got {}", arg);
    };
    let addr: CellAddress = cell.parse()?;
    Ok(Edit::Set(addr, text.to_string()))
}

fn parse_pair(flag: &str, arg: &str) -> anyhow::Result<(usize, usize)> {
    let parsed = arg
        .split_once(',')
        .and_then(|(r, c)| Some((r.trim().parse().ok()?, c.trim().parse().ok()?)));
    parsed.with_context(|| format!("{} expects <ROWS>,<COLS>, got {}", flag, arg))
}

fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", flag))
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => options.help = true,
            "-v" | "--verbose" => options.verbose = true,
            "-c" | "--command" => {
                options.command = Some(take_value(args, &mut i, arg)?.to_string());
            }
            "-s" | "--set" => {
                let edit = parse_assignment(take_value(args, &mut i, arg)?)?;
                options.edits.push(edit);
            }
            "--extend" => {
                let (rows, cols) = parse_pair(arg, take_value(args, &mut i, arg)?)?;
                options.edits.push(Edit::Extend(rows, cols));
            }
            "--shrink" => {
                let (rows, cols) = parse_pair(arg, take_value(args, &mut i, arg)?)?;
                options.edits.push(Edit::Shrink(rows, cols));
            }
            "-o" | "--output" => {
                options.output_file = Some(PathBuf::from(take_value(args, &mut i, arg)?));
            }
            "-w" | "--write" => {
                options.write_file = Some(PathBuf::from(take_value(args, &mut i, arg)?));
            }
            "--config" => {
                options.config_file = Some(PathBuf::from(take_value(args, &mut i, arg)?));
            }
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            arg => {
                if options.file_path.is_some() {
                    bail!("Unexpected argument: {}", arg);
                }
                options.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }
    Ok(options)
}

/// Evaluate a standalone formula. Without a sheet any reference is an error.
fn evaluate_command(formula: &str, sheet: Option<&mut Sheet>) -> Value {
    let text = if formula.starts_with('=') {
        formula.to_string()
    } else {
        format!("={}", formula)
    };
    let expr = parse_formula(&text);
    match sheet {
        None => expr.evaluate_detached(),
        Some(sheet) => {
            let values: HashMap<CellAddress, Value> = expr
                .references()
                .into_iter()
                .map(|addr| (addr, sheet.get_value(addr)))
                .collect();
            expr.evaluate(&|addr| values.get(&addr).cloned().unwrap_or_else(Value::empty))
        }
    }
}

fn print_invalidated(invalidated: &HashSet<CellAddress>) {
    let mut cells: Vec<_> = invalidated.iter().copied().collect();
    cells.sort_unstable();
    let names: Vec<String> = cells.iter().map(ToString::to_string).collect();
    eprintln!("Invalidated: {}", names.join(", "));
}

fn run(options: Options) -> anyhow::Result<ExitCode> {
    let (config, warnings) = config::load_config(options.config_file.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(formula) = &options.command
        && options.file_path.is_none()
        && options.edits.is_empty()
    {
        let value = evaluate_command(formula, None);
        println!("{}", format_value(&value));
        return Ok(exit_code_for(&value));
    }

    let mut sheet = match &options.file_path {
        Some(path) if path.exists() => Sheet::load_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        _ => Sheet::new(config.rows, config.columns),
    };

    for edit in &options.edits {
        let invalidated = match edit {
            Edit::Set(addr, text) => sheet.set_value(*addr, text)?,
            Edit::Extend(rows, cols) => sheet.extend(*rows, *cols),
            Edit::Shrink(rows, cols) => sheet.shrink(*rows, *cols),
        };
        if options.verbose {
            print_invalidated(&invalidated);
        }
    }

    if let Some(path) = &options.write_file {
        sheet
            .save_file(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        eprintln!("Saved to {}", path.display());
    }

    if let Some(formula) = &options.command {
        let value = evaluate_command(formula, Some(&mut sheet));
        println!("{}", format_value(&value));
        return Ok(exit_code_for(&value));
    }

    if let Some(path) = &options.output_file {
        write_markdown_file(path, &mut sheet)
            .with_context(|| format!("Failed to export {}", path.display()))?;
        eprintln!("Exported to {}", path.display());
    } else {
        let stdout = std::io::stdout();
        write_markdown(&mut stdout.lock(), &mut sheet)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn exit_code_for(value: &Value) -> ExitCode {
    if value.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };
    if options.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(options) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
