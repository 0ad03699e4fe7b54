//! Build command-line applications out of plain functions.
//!
//! Functions are declared with their parameters, registered on an [`App`]
//! and exposed as subcommands. Required parameters become positional
//! arguments, parameters with defaults become `--flags`, and a trailing
//! variadic parameter collects whatever positional tokens remain.

mod app;
mod command;
mod doc;
mod error;
mod parameter;
mod parser;
mod value;

pub use app::{App, DEFAULT_VERSION, Outcome};
pub use command::{Arguments, Command, FlatArgs, Function, Handler, command_name};
pub use doc::{clean_doc, split_help};
pub use error::{ArgumentError, ConfigError};
pub use parameter::{FormalParam, ParamKind, Parameter, ParameterAnnotation};
pub use parser::{command_parser, flatten_matches, parameter_arg, root_parser};
pub use value::{CoerceError, ParamType, Value};
