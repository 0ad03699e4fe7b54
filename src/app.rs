//! Application registry: command registration and dispatch.

use std::collections::HashMap;
use std::ffi::OsString;

use anyhow::{Context, Result};
use tracing::debug;

use crate::command::{Command, Function};
use crate::error::ConfigError;
use crate::parser::{VERSION_ARG, command_parser, flatten_matches, root_parser};
use crate::value::Value;

pub const DEFAULT_VERSION: &str = "1.0.0";

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No tokens were given; the top-level help was printed.
    Help,
    /// No command was selected and the version flag was set.
    Version,
    /// The first token named no registered command.
    NoCommand,
    /// A command ran and returned `value`.
    Completed { command: String, value: Value },
}

/// A command-line application assembled from registered functions.
#[derive(Debug)]
pub struct App {
    pub name: String,
    pub description: String,
    pub version: String,
    commands: HashMap<String, Command>,
}

impl App {
    /// Create an application. Empty description lines are dropped and the
    /// remaining ones are trimmed.
    pub fn new<N: Into<String>>(name: N, description: &str) -> Self {
        let description = description
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            name: name.into(),
            description,
            version: DEFAULT_VERSION.to_string(),
            commands: HashMap::new(),
        }
    }

    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = version.into();
        self
    }

    /// Print a line to stdout.
    pub fn log(&self, message: impl std::fmt::Display) {
        println!("{message}");
    }

    /// Turn a function into a command and store it under its dash-cased
    /// name, replacing any command already registered under that name.
    pub fn register(&mut self, function: Function) -> Result<&Command, ConfigError> {
        let command = Command::from_function(function)?;
        let name = command.name().to_string();
        if self.commands.contains_key(&name) {
            debug!(command = %name, "replacing previously registered command");
        } else {
            debug!(command = %name, params = command.parameters().len(), "registered command");
        }
        self.commands.insert(name.clone(), command);
        Ok(&self.commands[&name])
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered commands sorted by name.
    pub fn commands(&self) -> Vec<&Command> {
        let mut commands: Vec<&Command> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Build the full clap parser for every registered command.
    pub fn parser(&self) -> clap::Command {
        self.commands()
            .into_iter()
            .fold(root_parser(&self.name, &self.description), |parser, cmd| {
                parser.subcommand(command_parser(cmd))
            })
    }

    /// Parse tokens (without the program name) against the built parser.
    pub fn parse<I, T>(&self, tokens: I) -> Result<clap::ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.parser().no_binary_name(true).try_get_matches_from(tokens)
    }

    /// Parse `tokens`, run the selected command and report what happened.
    ///
    /// Parse errors and help requests come back as a [`clap::Error`];
    /// errors from the command itself are returned as they were raised.
    pub fn dispatch<I, T>(&self, tokens: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let tokens: Vec<OsString> = tokens.into_iter().map(Into::into).collect();
        let Some(first) = tokens.first() else {
            self.parser()
                .print_help()
                .context("failed to print help")?;
            return Ok(Outcome::Help);
        };

        let matches = self.parse(&tokens)?;
        let selected = first.to_str().and_then(|name| self.commands.get(name));

        let Some(command) = selected else {
            debug!(token = ?first, "no command selected");
            if matches.get_flag(VERSION_ARG) {
                self.log(&self.version);
                return Ok(Outcome::Version);
            }
            return Ok(Outcome::NoCommand);
        };

        let flat = matches
            .subcommand_matches(command.name())
            .map(|sub| flatten_matches(command, sub))
            .unwrap_or_default();
        let args = command.split_arguments(&flat)?;
        debug!(command = %command.name(), "invoking command");
        let value = command.call(args)?;
        Ok(Outcome::Completed {
            command: command.name().to_string(),
            value,
        })
    }

    /// Dispatch `tokens` as a process would: usage errors and help
    /// requests print through clap and exit.
    pub fn run_from<I, T>(&self, tokens: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.dispatch(tokens) {
            Err(err) => match err.downcast::<clap::Error>() {
                Ok(clap_err) => clap_err.exit(),
                Err(other) => Err(other),
            },
            outcome => outcome,
        }
    }

    /// Dispatch the process's own arguments.
    pub fn run(&self) -> Result<Outcome> {
        self.run_from(std::env::args_os().skip(1))
    }
}
