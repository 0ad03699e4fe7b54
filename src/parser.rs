//! clap wiring: parser construction and flat-mapping extraction.
//!
//! Each registered command becomes a clap subcommand whose arguments are
//! derived from its parameters. After parsing, the matches for the selected
//! subcommand are flattened back into a [`FlatArgs`] keyed by parameter name.

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, ArgMatches};

use crate::command::{Command, FlatArgs};
use crate::parameter::Parameter;
use crate::value::{ParamType, Value, format_choices};

/// Id of the top-level version switch.
pub const VERSION_ARG: &str = "version";

/// Top-level parser without any subcommands attached.
pub fn root_parser(name: &str, description: &str) -> clap::Command {
    clap::Command::new(name.to_string())
        .about(description.to_string())
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .allow_external_subcommands(true)
        .arg(
            Arg::new(VERSION_ARG)
                .short('v')
                .long(VERSION_ARG)
                .action(ArgAction::SetTrue)
                .help("show the program version"),
        )
}

/// Long flag clap reserves for its generated help switch.
const HELP_FLAG: &str = "help";

/// clap id for a parameter; prefixed so it never collides with the ids
/// clap generates for itself (`help`).
fn arg_id(name: &str) -> String {
    format!("param:{name}")
}

/// Build the clap subcommand for one command.
///
/// An optional parameter named `help` takes over `--help`, so the generated
/// help switch is dropped for that command.
pub fn command_parser(command: &Command) -> clap::Command {
    let mut sub =
        clap::Command::new(command.name().to_string()).about(command.description().to_string());
    if !command.documentation().is_empty() {
        sub = sub.long_about(command.documentation().to_string());
    }
    if command
        .parameters()
        .iter()
        .any(|p| !p.required && !p.is_variadic() && p.name == HELP_FLAG)
    {
        sub = sub.disable_help_flag(true);
    }
    for param in command.parameters() {
        sub = sub.arg(parameter_arg(param));
    }
    sub
}

/// Map one parameter onto a clap argument.
///
/// - variadic: trailing positional taking zero or more tokens;
/// - required: positional with type coercion and choices;
/// - optional boolean: switch that flips the declared default;
/// - other optional: `--name VALUE` with coercion and choices.
///
/// Numeric parameters accept negative values such as `-1`.
pub fn parameter_arg(param: &Parameter) -> Arg {
    let arg = Arg::new(arg_id(&param.name)).help(param.description.clone());

    if param.is_variadic() {
        return arg
            .value_name(param.pretty_name.clone())
            .num_args(0..)
            .action(ArgAction::Append)
            .value_parser(coercer(ParamType::VariadicList, None));
    }

    let numeric = matches!(param.ty, ParamType::Integer | ParamType::Float);

    if param.required {
        return arg
            .value_name(param.pretty_name.clone())
            .required(true)
            .action(ArgAction::Set)
            .allow_negative_numbers(numeric)
            .value_parser(coercer(param.ty, param.choices.clone()));
    }

    let arg = arg.long(param.name.clone()).required(false);
    if param.ty == ParamType::Boolean {
        let action = if param.flips_to_false() {
            ArgAction::SetFalse
        } else {
            ArgAction::SetTrue
        };
        return arg.action(action);
    }

    arg.value_name(param.pretty_name.clone())
        .num_args(1)
        .action(ArgAction::Set)
        .allow_negative_numbers(numeric)
        .help(option_help(param))
        .value_parser(coercer(param.ty, param.choices.clone()))
}

fn option_help(param: &Parameter) -> String {
    let mut help = param.description.clone();
    if let Some(choices) = &param.choices {
        help.push_str(&format!(" [possible values: {}]", format_choices(choices)));
    }
    if let Some(default) = param.default.as_ref().filter(|d| !d.is_null()) {
        help.push_str(&format!(" [default: {default}]"));
    }
    help
}

fn coercer(ty: ParamType, choices: Option<Vec<Value>>) -> ValueParser {
    ValueParser::new(move |raw: &str| ty.coerce_choice(raw, choices.as_deref()))
}

/// Collect the parsed values of `command`'s parameters from its matches.
///
/// Optional parameters the user did not supply take their declared
/// default. A required parameter clap did not record is left out so the
/// gap surfaces during argument reconstruction.
pub fn flatten_matches(command: &Command, matches: &ArgMatches) -> FlatArgs {
    let mut flat = FlatArgs::new();
    for param in command.parameters() {
        let id = arg_id(&param.name);
        let id = id.as_str();
        let value = if param.is_variadic() {
            let items = matches
                .get_many::<Value>(id)
                .map(|vals| vals.cloned().collect())
                .unwrap_or_default();
            Some(Value::List(items))
        } else if param.required {
            matches.get_one::<Value>(id).cloned()
        } else if param.ty == ParamType::Boolean {
            Some(Value::Boolean(matches.get_flag(id)))
        } else {
            matches
                .get_one::<Value>(id)
                .cloned()
                .or_else(|| param.default.clone())
        };
        if let Some(value) = value {
            flat.insert(param.name.clone(), value);
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Arguments, Function};
    use crate::parameter::{FormalParam, ParameterAnnotation};
    use pretty_assertions::assert_eq;

    fn noop(_: Arguments) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }

    fn parse(command: &Command, tokens: &[&str]) -> Result<FlatArgs, clap::Error> {
        let parser = command_parser(command).no_binary_name(true);
        let matches = parser.try_get_matches_from(tokens.iter().copied())?;
        Ok(flatten_matches(command, &matches))
    }

    fn flags() -> Command {
        Command::from_function(
            Function::new("flags", noop)
                .param(FormalParam::new("count").typed(ParamType::Integer))
                .param(FormalParam::new("loud").default(false))
                .param(FormalParam::new("color").default(true))
                .param(FormalParam::new("ratio").default(0.5)),
        )
        .unwrap()
    }

    #[test]
    fn defaults_fill_absent_options() {
        let flat = parse(&flags(), &["3"]).unwrap();
        assert_eq!(
            flat,
            FlatArgs::from([
                ("count".to_string(), Value::Integer(3)),
                ("loud".to_string(), Value::Boolean(false)),
                ("color".to_string(), Value::Boolean(true)),
                ("ratio".to_string(), Value::Float(0.5)),
            ])
        );
    }

    #[test]
    fn boolean_switches_flip_their_default() {
        let flat = parse(&flags(), &["3", "--loud", "--color", "--ratio", "2"]).unwrap();
        assert_eq!(flat["loud"], Value::Boolean(true));
        assert_eq!(flat["color"], Value::Boolean(false));
        assert_eq!(flat["ratio"], Value::Float(2.0));
    }

    #[test]
    fn coercion_failure_is_a_usage_error() {
        let err = parse(&flags(), &["three"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn choices_restrict_values() {
        let cmd = Command::from_function(
            Function::new("greet", noop).param(
                FormalParam::new("greeting").default("hello").annotated(
                    ParameterAnnotation::new("Greeting", ParamType::Text)
                        .choices(["hello", "hi"]),
                ),
            ),
        )
        .unwrap();
        assert_eq!(
            parse(&cmd, &["--greeting", "hi"]).unwrap()["greeting"],
            Value::from("hi")
        );
        assert!(parse(&cmd, &["--greeting", "yo"]).is_err());
    }

    #[test]
    fn variadic_collects_remaining_tokens() {
        let cmd = Command::from_function(
            Function::new("concat", noop)
                .param(FormalParam::new("first"))
                .param(FormalParam::variadic("words")),
        )
        .unwrap();
        let flat = parse(&cmd, &["a", "b", "c"]).unwrap();
        assert_eq!(flat["first"], Value::from("a"));
        assert_eq!(flat["words"], Value::from(vec!["b", "c"]));

        let flat = parse(&cmd, &["a"]).unwrap();
        assert_eq!(flat["words"], Value::List(Vec::new()));
    }

    #[test]
    fn numeric_parameters_take_negative_values() {
        let flat = parse(&flags(), &["-3", "--ratio", "-0.25"]).unwrap();
        assert_eq!(flat["count"], Value::Integer(-3));
        assert_eq!(flat["ratio"], Value::Float(-0.25));
    }

    #[test]
    fn text_parameters_still_reject_dash_tokens() {
        let cmd = Command::from_function(Function::new("say", noop).param(FormalParam::new("msg")))
            .unwrap();
        let err = parse(&cmd, &["-x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
        assert_eq!(parse(&cmd, &["--", "-x"]).unwrap()["msg"], Value::from("-x"));
    }

    #[test]
    fn positional_named_help_keeps_help_flag() {
        let cmd = Command::from_function(Function::new("show", noop).param(FormalParam::new("help")))
            .unwrap();
        assert_eq!(parse(&cmd, &["topic"]).unwrap()["help"], Value::from("topic"));
        let err = parse(&cmd, &["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn option_named_help_takes_over_help_flag() {
        let cmd = Command::from_function(
            Function::new("show", noop).param(FormalParam::new("help").default("short")),
        )
        .unwrap();
        assert_eq!(parse(&cmd, &[]).unwrap()["help"], Value::from("short"));
        assert_eq!(
            parse(&cmd, &["--help", "long"]).unwrap()["help"],
            Value::from("long")
        );
    }

    #[test]
    fn missing_positional_is_a_usage_error() {
        let err = parse(&flags(), &[]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn option_help_mentions_choices_and_default() {
        let param = Parameter::from_formal(&FormalParam::new("prec").default(2)).unwrap();
        assert_eq!(option_help(&param), "Parameter 'prec' of Number [default: 2]");
    }
}
