//! Error taxonomy for command construction and argument reconstruction.
//!
//! Coercion failures live next to the value types in [`crate::value`];
//! parse failures and help requests are reported as [`clap::Error`].

use thiserror::Error;

/// Raised while turning a function descriptor into a command.
///
/// These are fatal: a command that fails here is never registered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("parameter '{0}': variable number of optional arguments not supported")]
    VariadicKeyword(String),
    #[error("parameter '{parameter}': variadic parameter must be the last one declared")]
    VariadicNotTrailing { parameter: String },
    #[error("parameter '{0}' is declared more than once")]
    DuplicateParameter(String),
    #[error("parameter '{parameter}': unsupported type {found}")]
    UnsupportedType { parameter: String, found: String },
}

/// The parsed mapping and the command's parameter list disagree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("command '{command}': no parsed value for parameter '{parameter}'")]
    Missing { command: String, parameter: String },
    #[error("variadic parameter '{0}' did not receive a list")]
    NotAList(String),
}
