use std::{io, path::PathBuf};

use chrono::NaiveDate;
use strsim::levenshtein;
use thiserror::Error;

use super::{commands, output, registry::CommandRegistry, shell::parse_command_line};
use crate::{
    config::{is_valid_date_format, Config, ConfigManager},
    errors::LedgerError,
    points::{PointsAccount, DATE_FORMAT},
    storage::{JsonStorage, StorageBackend},
    utils::paths::app_data_dir,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// User-facing shell error.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

/// Runtime state of the shell: the open account plus configuration and storage.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub(crate) registry: CommandRegistry,
    pub account: PointsAccount,
    pub config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) storage: JsonStorage,
    pub last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Shell whose accounts and configuration live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let storage = JsonStorage::new(Some(base))?;
        let config_manager = ConfigManager::with_base_dir(storage.base_dir().to_path_buf())?;
        let config = config_manager.load()?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut context = Self {
            mode,
            running: true,
            registry,
            account: PointsAccount::default(),
            config,
            config_manager,
            storage,
            last_command: None,
        };
        context.reopen_last_account();
        Ok(context)
    }

    fn reopen_last_account(&mut self) {
        let Some(name) = self.config.last_opened_account.clone() else {
            return;
        };
        match self.storage.load(&name) {
            Ok(account) => self.account = account,
            Err(err) => tracing::warn!(%name, %err, "could not reopen last account"),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        format!("money [{}]> ", self.account.name)
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        if is_valid_date_format(&self.config.date_format) {
            date.format(&self.config.date_format).to_string()
        } else {
            date.format(DATE_FORMAT).to_string()
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and runs a single input line.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(LedgerError::InsufficientPoints {
                requested,
                available,
            }) => {
                output::error(format!(
                    "Can't use more points than the current balance ({} requested, {} available).",
                    requested, available
                ));
            }
            other => output::error(other),
        }
    }

    pub(crate) fn save_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: PathBuf,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(context)
}
