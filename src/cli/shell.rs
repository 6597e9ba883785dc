use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, DefaultEditor};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::config::Config;

pub const SCRIPT_ENV: &str = "STOCK_LEDGER_CLI_SCRIPT";

/// Parsed process arguments: the global `--file` override plus the command words.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Invocation {
    pub(crate) file: Option<String>,
    pub(crate) words: Vec<String>,
}

pub(crate) fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Invocation, CliError> {
    let mut invocation = Invocation::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if !invocation.words.is_empty() {
            invocation.words.push(arg);
        } else if arg == "--file" || arg == "-f" {
            let path = args
                .next()
                .ok_or_else(|| CliError::Command("`--file` requires a path".into()))?;
            invocation.file = Some(path);
        } else if let Some(path) = arg.strip_prefix("--file=") {
            invocation.file = Some(path.to_string());
        } else {
            invocation.words.push(arg);
        }
    }
    Ok(invocation)
}

/// Entry point for the `stock_ledger_cli` binary.
pub fn run_cli(args: impl IntoIterator<Item = String>) -> Result<(), CliError> {
    let invocation = parse_args(args)?;
    let mut config = Config::from_env()?;
    if let Some(file) = invocation.file {
        config = config.with_data_file(file);
    }

    let script_requested = std::env::var_os(SCRIPT_ENV).is_some()
        || invocation.words.first().map(String::as_str) == Some("script");
    let mode = if script_requested {
        CliMode::Script
    } else if invocation.words.is_empty() {
        CliMode::Interactive
    } else {
        CliMode::OneShot
    };

    let mut context = ShellContext::new(mode, config);
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
        CliMode::OneShot => run_one_shot(&mut context, &invocation.words),
    }
}

/// Loads the data file, runs one command, and writes the ledger back when it changed.
fn run_one_shot(context: &mut ShellContext, words: &[String]) -> Result<(), CliError> {
    let command = words[0].to_lowercase();
    let args: Vec<&str> = words.iter().skip(1).map(String::as_str).collect();

    if ShellContext::session_only(&command) {
        context.report_error(CommandError::InvalidArguments(format!(
            "`{command}` is only available in script or interactive sessions"
        )));
        return Err(CliError::Command(format!("`{command}` failed")));
    }

    let persist = ShellContext::mutates(&command);
    if command != "demo" {
        context.ledger = context.store.load()?;
    }

    match context.dispatch(&command, &args) {
        Ok(_) => {}
        Err(CommandError::Rejected(reason)) => {
            context.report_error(CommandError::Rejected(reason));
            return Ok(());
        }
        Err(err) => {
            if let CommandError::UnknownCommand(_) | CommandError::InvalidArguments(_) = err {
                context.report_error(err);
                return Err(CliError::Command(format!("`{command}` failed")));
            }
            return Err(err.into());
        }
    }

    if persist {
        context.store.save(&context.ledger)?;
    }
    Ok(())
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    output::info("Type `help` for available commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                handle_line(context, trimmed);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        handle_line(context, &line);
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse line: {err}"));
            return;
        }
    };

    let Some(raw) = tokens.first() else {
        return;
    };
    let command = raw.to_lowercase();
    if context.mode == CliMode::Script && command == "script" {
        return;
    }
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    match context.dispatch(&command, &args) {
        Ok(LoopControl::Continue) => {}
        Ok(LoopControl::Exit) => context.running = false,
        Err(err) => context.report_error(err),
    }
}
