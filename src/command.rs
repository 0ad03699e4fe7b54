//! Commands built from explicit function descriptors.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use tracing::trace;

use crate::doc::split_help;
use crate::error::{ArgumentError, ConfigError};
use crate::parameter::{FormalParam, ParamKind, Parameter};
use crate::value::Value;

/// Callable wrapped by a command.
pub type Handler = dyn Fn(Arguments) -> Result<Value>;

/// Flat mapping from parameter name to parsed value.
pub type FlatArgs = BTreeMap<String, Value>;

/// Arguments handed to a handler: required values in declaration order
/// followed by any variadic values, plus the optional ones by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub keyword: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new(positional: Vec<Value>, keyword: BTreeMap<String, Value>) -> Self {
        Self {
            positional,
            keyword,
        }
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Positional values from `index` onwards, typically the variadic tail.
    pub fn rest(&self, index: usize) -> &[Value] {
        self.positional.get(index..).unwrap_or(&[])
    }
}

/// A function declaration a command is built from.
///
/// ```
/// use fncli::{Function, FormalParam, Value};
///
/// let sum = Function::new("add_all", |args| {
///     let total: f64 = args.positional.iter().filter_map(Value::as_f64).sum();
///     Ok(Value::Float(total))
/// })
/// .doc("Add numbers together")
/// .param(FormalParam::variadic("numbers"));
/// ```
pub struct Function {
    pub ident: String,
    pub doc: Option<String>,
    pub params: Vec<FormalParam>,
    handler: Rc<Handler>,
}

impl Function {
    pub fn new<S, F>(ident: S, handler: F) -> Self
    where
        S: Into<String>,
        F: Fn(Arguments) -> Result<Value> + 'static,
    {
        Self {
            ident: ident.into(),
            doc: None,
            params: Vec::new(),
            handler: Rc::new(handler),
        }
    }

    pub fn doc<S: Into<String>>(mut self, doc: S) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, param: FormalParam) -> Self {
        self.params.push(param);
        self
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("ident", &self.ident)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Turn a function identifier into a command name (`do_it` -> `do-it`).
pub fn command_name(ident: &str) -> String {
    ident.replace('_', "-")
}

/// A named, invocable unit with its help text and parameters resolved.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    documentation: String,
    parameters: Vec<Parameter>,
    func: Rc<Handler>,
}

impl Command {
    /// Resolve a function declaration into a command.
    ///
    /// Fails if any parameter is invalid, if a name repeats, or if a
    /// variadic parameter is not the last one.
    pub fn from_function(function: Function) -> Result<Self, ConfigError> {
        let name = command_name(&function.ident);
        let (description, documentation) = split_help(&name, function.doc.as_deref());

        let mut seen = HashSet::new();
        let mut parameters = Vec::with_capacity(function.params.len());
        let last = function.params.len().saturating_sub(1);
        for (idx, formal) in function.params.iter().enumerate() {
            let param = Parameter::from_formal(formal)?;
            if !seen.insert(param.name.clone()) {
                return Err(ConfigError::DuplicateParameter(param.name));
            }
            if formal.kind == ParamKind::VariadicPositional && idx != last {
                return Err(ConfigError::VariadicNotTrailing {
                    parameter: param.name,
                });
            }
            parameters.push(param);
        }

        Ok(Self {
            name,
            description,
            documentation,
            parameters,
            func: function.handler,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line summary shown in the command list.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Long help shown by `<command> --help`; may be empty.
    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Rebuild call arguments from a flat parsed mapping.
    ///
    /// Required parameters become positional in declaration order, the
    /// variadic values are appended after them, and every other optional
    /// parameter is passed by name. Every parameter must be present in
    /// `flat`.
    pub fn split_arguments(&self, flat: &FlatArgs) -> Result<Arguments, ArgumentError> {
        let lookup = |param: &Parameter| {
            flat.get(&param.name).ok_or_else(|| ArgumentError::Missing {
                command: self.name.clone(),
                parameter: param.name.clone(),
            })
        };

        let mut args = Arguments::default();
        for param in self.parameters.iter().filter(|p| p.required) {
            args.positional.push(lookup(param)?.clone());
        }
        for param in self.parameters.iter().filter(|p| !p.required) {
            let value = lookup(param)?;
            if param.is_variadic() {
                let items = value
                    .as_list()
                    .ok_or_else(|| ArgumentError::NotAList(param.name.clone()))?;
                args.positional.extend(items.iter().cloned());
            } else {
                args.keyword.insert(param.name.clone(), value.clone());
            }
        }
        trace!(
            command = %self.name,
            positional = args.positional.len(),
            keyword = args.keyword.len(),
            "reconstructed call arguments"
        );
        Ok(args)
    }

    /// Invoke the wrapped function. Its errors are returned untouched.
    pub fn call(&self, args: Arguments) -> Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("documentation", &self.documentation)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterAnnotation;
    use crate::value::ParamType;
    use pretty_assertions::assert_eq;

    fn noop(_: Arguments) -> Result<Value> {
        Ok(Value::Null)
    }

    fn sample() -> Command {
        Command::from_function(
            Function::new("mixed_bag", noop)
                .param(FormalParam::new("a"))
                .param(FormalParam::new("b"))
                .param(FormalParam::new("c").default(5))
                .param(FormalParam::variadic("rest")),
        )
        .unwrap()
    }

    #[test]
    fn name_is_dash_cased() {
        assert_eq!(sample().name(), "mixed-bag");
        assert_eq!(sample().description(), "mixed-bag");
        assert_eq!(sample().documentation(), "");
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let cmd = sample();
        let names: Vec<&str> = cmd.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "rest"]);
    }

    #[test]
    fn reconstructs_positional_and_keyword_arguments() {
        let flat = FlatArgs::from([
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::from(2)),
            ("c".to_string(), Value::from(7)),
            ("rest".to_string(), Value::from(vec![9, 10])),
        ]);
        let args = sample().split_arguments(&flat).unwrap();
        assert_eq!(
            args.positional,
            vec![Value::from(1), Value::from(2), Value::from(9), Value::from(10)]
        );
        assert_eq!(args.keyword, BTreeMap::from([("c".to_string(), Value::from(7))]));
        assert_eq!(args.rest(2), &[Value::from(9), Value::from(10)]);
    }

    #[test]
    fn missing_key_fails_loudly() {
        let flat = FlatArgs::from([("a".to_string(), Value::from(1))]);
        assert_eq!(
            sample().split_arguments(&flat),
            Err(ArgumentError::Missing {
                command: "mixed-bag".into(),
                parameter: "b".into(),
            })
        );
    }

    #[test]
    fn variadic_value_must_be_a_list() {
        let flat = FlatArgs::from([
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::from(2)),
            ("c".to_string(), Value::from(7)),
            ("rest".to_string(), Value::from("9")),
        ]);
        assert_eq!(
            sample().split_arguments(&flat),
            Err(ArgumentError::NotAList("rest".into()))
        );
    }

    #[test]
    fn doc_is_split_into_summary_and_body() {
        let cmd = Command::from_function(
            Function::new("echo", noop).doc(
                "Echo command help message

                Detailed echo command help message that will be shown
                when the echo command is followed by --help",
            ),
        )
        .unwrap();
        assert_eq!(cmd.description(), "Echo command help message");
        assert_eq!(
            cmd.documentation(),
            "Detailed echo command help message that will be shown\nwhen the echo command is followed by --help"
        );
    }

    #[test]
    fn variadic_must_trail() {
        let err = Command::from_function(
            Function::new("bad", noop)
                .param(FormalParam::variadic("rest"))
                .param(FormalParam::new("a")),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::VariadicNotTrailing {
                parameter: "rest".into()
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Command::from_function(
            Function::new("bad", noop)
                .param(FormalParam::new("a"))
                .param(FormalParam::new("a").default(1)),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateParameter("a".into()));
    }

    #[test]
    fn keyword_catch_all_blocks_construction() {
        let err = Command::from_function(
            Function::new("bad", noop)
                .param(FormalParam::new("a"))
                .param(FormalParam::keywords("extra")),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::VariadicKeyword("extra".into()));
    }

    #[test]
    fn call_passes_arguments_through() {
        let cmd = Command::from_function(
            Function::new("sum", |args: Arguments| {
                let a = args.arg(0).and_then(Value::as_f64).unwrap_or_default();
                let b = args.arg(1).and_then(Value::as_f64).unwrap_or_default();
                Ok(Value::Float(a + b))
            })
            .param(FormalParam::new("a").annotated(ParameterAnnotation::new(
                "Addend1",
                ParamType::Float,
            )))
            .param(FormalParam::new("b").typed(ParamType::Float)),
        )
        .unwrap();
        let out = cmd
            .call(Arguments::new(
                vec![Value::Float(1.5), Value::Float(2.0)],
                BTreeMap::new(),
            ))
            .unwrap();
        assert_eq!(out, Value::Float(3.5));
    }

    #[test]
    fn handler_errors_pass_through() {
        let cmd = Command::from_function(Function::new("fail", |_| {
            Err(anyhow::anyhow!("boom"))
        }))
        .unwrap();
        let err = cmd.call(Arguments::default()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
