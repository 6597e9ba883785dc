//! Command-line shell over a single stock ledger: one-shot commands, scripted
//! stdin, or an interactive prompt.

pub mod core;
pub mod output;
mod shell;

pub use self::core::{CliError, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
