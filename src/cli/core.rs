use std::io::{self, Write};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    cli::output,
    config::Config,
    errors::{InputError, LedgerError},
    ledger::{LogEntry, Quantity, Removal, StockLedger},
    storage::JsonStore,
};

/// Every command the shell understands, with its usage line.
pub(crate) const COMMANDS: &[(&str, &str)] = &[
    ("add", "add <item> <quantity>      add stock for an item"),
    ("remove", "remove <item> <quantity>   take stock away from an item"),
    ("get", "get <item>                 show the quantity held for an item"),
    ("low", "low [threshold]            list items below the threshold"),
    ("report", "report                     list every item and its quantity"),
    ("save", "save                       write the ledger to the data file"),
    ("load", "load                       replace the ledger with the data file"),
    ("log", "log                        show add-log entries for this session"),
    ("demo", "demo                       run the sample inventory scenario"),
    ("help", "help                       show this overview"),
    ("exit", "exit                       leave the shell"),
];

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Command(String),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("ignored: {0}")]
    Rejected(#[from] InputError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Ledger(err) => CliError::Ledger(err),
            CommandError::Io(err) => CliError::Io(err),
            other => CliError::Command(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CliMode {
    Interactive,
    Script,
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub(crate) type CommandResult = Result<LoopControl, CommandError>;

/// Mutable state shared by every command of one CLI session.
pub(crate) struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) ledger: StockLedger,
    pub(crate) store: JsonStore,
    pub(crate) config: Config,
    pub(crate) session_log: Vec<LogEntry>,
    pub(crate) running: bool,
}

impl ShellContext {
    pub(crate) fn new(mode: CliMode, config: Config) -> Self {
        Self {
            mode,
            ledger: StockLedger::new(),
            store: JsonStore::new(config.data_file.clone()),
            config,
            session_log: Vec::new(),
            running: true,
        }
    }

    pub(crate) fn prompt(&self) -> String {
        format!("stock ({} items)> ", self.ledger.len())
    }

    /// Whether a one-shot run of `command` must write the ledger back.
    pub(crate) fn mutates(command: &str) -> bool {
        matches!(command, "add" | "remove")
    }

    /// Commands that only make sense across a multi-command session.
    pub(crate) fn session_only(command: &str) -> bool {
        matches!(command, "log")
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match command {
            "add" => self.cmd_add(args),
            "remove" => self.cmd_remove(args),
            "get" => self.cmd_get(args),
            "low" => self.cmd_low(args),
            "report" => self.cmd_report(),
            "save" => self.cmd_save(),
            "load" => self.cmd_load(),
            "log" => self.cmd_log(),
            "demo" => self.cmd_demo(),
            "help" => self.cmd_help(),
            "exit" => Ok(LoopControl::Exit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    fn cmd_add(&mut self, args: &[&str]) -> CommandResult {
        let [item, raw] = expect_args::<2>(args, "add <item> <quantity>")?;
        let quantity: Quantity = raw.parse()?;
        self.ledger
            .add_logged(item, quantity, &mut self.session_log)?;
        output::success(format!(
            "Added {quantity} of {item} (now {})",
            self.ledger.quantity(item)
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_remove(&mut self, args: &[&str]) -> CommandResult {
        let [item, raw] = expect_args::<2>(args, "remove <item> <quantity>")?;
        let quantity: Quantity = raw.parse()?;
        match self.ledger.remove(item, quantity)? {
            Removal::Decremented(remaining) => {
                output::success(format!("Removed {quantity} of {item} (now {remaining})"))
            }
            Removal::Cleared => output::success(format!("Removed {item} from stock")),
            // The ledger already warned about the missing item.
            Removal::Missing => {}
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_get(&mut self, args: &[&str]) -> CommandResult {
        let [item] = expect_args::<1>(args, "get <item>")?;
        println!("{item}: {}", self.ledger.quantity(item));
        Ok(LoopControl::Continue)
    }

    fn cmd_low(&mut self, args: &[&str]) -> CommandResult {
        let threshold = match args {
            [] => self.config.low_stock_threshold,
            [raw] => raw.parse()?,
            _ => return Err(usage("low [threshold]")),
        };
        println!("Low items: {}", self.ledger.low_stock(threshold).join(", "));
        Ok(LoopControl::Continue)
    }

    fn cmd_report(&mut self) -> CommandResult {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.ledger.report(&mut handle)?;
        handle.flush()?;
        Ok(LoopControl::Continue)
    }

    fn cmd_save(&mut self) -> CommandResult {
        self.store.save(&self.ledger)?;
        output::success(format!("Saved ledger to {}", self.store.path().display()));
        Ok(LoopControl::Continue)
    }

    fn cmd_load(&mut self) -> CommandResult {
        self.ledger = self.store.load()?;
        output::info(format!(
            "Loaded {} items from {}",
            self.ledger.len(),
            self.store.path().display()
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_log(&mut self) -> CommandResult {
        if self.session_log.is_empty() {
            output::info("No stock added in this session.");
        }
        for entry in &self.session_log {
            println!("{entry}");
        }
        Ok(LoopControl::Continue)
    }

    /// Runs the sample scenario against a fresh ledger, then saves and reloads it.
    fn cmd_demo(&mut self) -> CommandResult {
        output::section("Demo");
        self.ledger = StockLedger::new();
        for (item, quantity) in [("apple", 10), ("banana", 2), ("mango", 1)] {
            self.ledger
                .add_logged(item, quantity, &mut self.session_log)?;
        }
        self.ledger.remove("apple", 3)?;
        self.ledger.remove("orange", 1)?;

        println!("Apple stock: {}", self.ledger.quantity("apple"));
        println!(
            "Low items: {}",
            self.ledger
                .low_stock(self.config.low_stock_threshold)
                .join(", ")
        );

        self.cmd_save()?;
        self.cmd_load()?;
        self.cmd_report()
    }

    fn cmd_help(&mut self) -> CommandResult {
        output::section("Available commands");
        for (_, usage) in COMMANDS {
            println!("  {usage}");
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::Rejected(reason) => output::warning(format!("Ignored: {reason}")),
            CommandError::UnknownCommand(ref name) => {
                output::error(&err);
                if let Some(best) = suggest(name) {
                    output::info(format!("Suggestion: `{best}`?"));
                }
            }
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help` for usage details.");
            }
            other => output::error(other),
        }
    }
}

fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

fn expect_args<'a, const N: usize>(
    args: &[&'a str],
    usage_text: &str,
) -> Result<[&'a str; N], CommandError> {
    <[&'a str; N]>::try_from(args).map_err(|_| usage(usage_text))
}

/// Closest known command name, if any is within three edits.
pub(crate) fn suggest(input: &str) -> Option<&'static str> {
    let mut suggestions: Vec<_> = COMMANDS
        .iter()
        .map(|(name, _)| (levenshtein(name, input), *name))
        .collect();
    suggestions.sort_by_key(|(distance, _)| *distance);
    suggestions
        .first()
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context_in(temp: &TempDir) -> ShellContext {
        let config = Config::default().with_data_file(temp.path().join("inventory.json"));
        ShellContext::new(CliMode::Script, config)
    }

    #[test]
    fn add_and_remove_commands_update_ledger() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);

        ctx.dispatch("add", &["apple", "10"]).unwrap();
        ctx.dispatch("remove", &["apple", "4"]).unwrap();
        assert_eq!(ctx.ledger.quantity("apple"), Quantity::Int(6));
        assert_eq!(ctx.session_log.len(), 1);
    }

    #[test]
    fn non_numeric_quantity_is_rejected_without_mutation() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);

        let err = ctx.dispatch("add", &["apple", "lots"]).unwrap_err();
        assert!(matches!(err, CommandError::Rejected(InputError::NotANumber)));
        assert!(ctx.ledger.is_empty());
        assert!(ctx.session_log.is_empty());
    }

    #[test]
    fn wrong_arity_reports_usage() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);
        let err = ctx.dispatch("add", &["apple"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(msg) if msg.contains("usage")));
    }

    #[test]
    fn demo_leaves_expected_snapshot() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);

        ctx.dispatch("demo", &[]).unwrap();
        assert_eq!(ctx.ledger.quantity("apple"), Quantity::Int(7));
        assert_eq!(ctx.ledger.low_stock(5), vec!["banana", "mango"]);
        assert!(!ctx.ledger.contains("orange"));
        assert!(temp.path().join("inventory.json").exists());
    }

    #[test]
    fn exit_stops_the_loop() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);
        assert_eq!(ctx.dispatch("exit", &[]).unwrap(), LoopControl::Exit);
    }

    #[test]
    fn suggests_close_command_names() {
        assert_eq!(suggest("reprot"), Some("report"));
        assert_eq!(suggest("remvoe"), Some("remove"));
        assert_eq!(suggest("zzzzzzzzzz"), None);
    }

    #[test]
    fn only_add_and_remove_mutate() {
        assert!(ShellContext::mutates("add"));
        assert!(ShellContext::mutates("remove"));
        assert!(!ShellContext::mutates("report"));
        assert!(ShellContext::session_only("log"));
        assert!(!ShellContext::session_only("report"));
    }

    #[test]
    fn every_listed_command_is_dispatched() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);
        for (name, _) in COMMANDS {
            let result = ctx.dispatch(name, &[]);
            assert!(
                !matches!(result, Err(CommandError::UnknownCommand(_))),
                "`{name}` is listed but not dispatched"
            );
        }
    }

    #[test]
    fn unlisted_aliases_are_unknown() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context_in(&temp);
        for alias in ["rm", "list", "quit"] {
            assert!(matches!(
                ctx.dispatch(alias, &["apple", "1"]),
                Err(CommandError::UnknownCommand(_))
            ));
        }
    }
}
