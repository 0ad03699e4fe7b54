//! Parameter descriptors derived from declared function parameters.
//!
//! A [`FormalParam`] is what a command author writes down about one
//! argument of a function; [`Parameter`] is the resolved view used to
//! build the parser and to rebuild the call.

use crate::error::ConfigError;
use crate::value::{ParamType, Value};

/// How a declared parameter binds arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
    #[default]
    Ordinary,
    /// Collects any remaining positional arguments.
    VariadicPositional,
    /// Collects arbitrary keyword arguments. Never accepted.
    VariadicKeyword,
}

/// Explicit per-parameter metadata supplied by the command author.
///
/// When attached, it fully replaces the inferred display name, type,
/// description and choices.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAnnotation {
    pub name: String,
    pub ty: ParamType,
    pub description: String,
    pub choices: Option<Vec<Value>>,
}

impl ParameterAnnotation {
    pub fn new<S: Into<String>>(name: S, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: String::new(),
            choices: None,
        }
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }
}

/// A parameter as declared on a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParam {
    pub name: String,
    pub kind: ParamKind,
    /// Bare type marker, e.g. `a: int` without further metadata.
    pub marker: Option<ParamType>,
    /// `None` means no default was declared; `Some(Value::Null)` is a null default.
    pub default: Option<Value>,
    pub annotation: Option<ParameterAnnotation>,
}

impl FormalParam {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Ordinary,
            marker: None,
            default: None,
            annotation: None,
        }
    }

    /// A trailing parameter that swallows the remaining positional tokens.
    pub fn variadic<S: Into<String>>(name: S) -> Self {
        Self {
            kind: ParamKind::VariadicPositional,
            ..Self::new(name)
        }
    }

    /// A catch-all keyword parameter; registering it fails.
    pub fn keywords<S: Into<String>>(name: S) -> Self {
        Self {
            kind: ParamKind::VariadicKeyword,
            ..Self::new(name)
        }
    }

    pub fn typed(mut self, ty: ParamType) -> Self {
        self.marker = Some(ty);
        self
    }

    pub fn default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn annotated(mut self, annotation: ParameterAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

/// Resolved metadata for one command parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub pretty_name: String,
    pub ty: ParamType,
    pub description: String,
    pub choices: Option<Vec<Value>>,
    pub required: bool,
    /// Value used when an optional parameter is not supplied; `None` when required.
    pub default: Option<Value>,
}

impl Parameter {
    /// Derive a parameter from its declaration.
    ///
    /// Precedence: explicit annotation, then bare type marker, then the type
    /// of a non-null default, then `Text`. A parameter is required exactly
    /// when it declares no default. Variadic parameters are always an
    /// optional list defaulting to empty, whatever their annotation says.
    pub fn from_formal(formal: &FormalParam) -> Result<Self, ConfigError> {
        let name = formal.name.clone();
        if formal.kind == ParamKind::VariadicKeyword {
            return Err(ConfigError::VariadicKeyword(name));
        }
        let variadic = formal.kind == ParamKind::VariadicPositional;

        let (pretty_name, ty, description, choices) = if let Some(ann) = &formal.annotation {
            (
                ann.name.clone(),
                ann.ty,
                ann.description.clone(),
                ann.choices.clone(),
            )
        } else {
            let ty = match (formal.marker, formal.default.as_ref()) {
                (Some(marker), _) => marker,
                (None, Some(default)) if !default.is_null() => {
                    default.kind().ok_or_else(|| ConfigError::UnsupportedType {
                        parameter: name.clone(),
                        found: "list default".to_string(),
                    })?
                }
                _ => ParamType::Text,
            };
            (name.clone(), ty, describe(&name, ty), None)
        };

        if ty == ParamType::VariadicList && !variadic {
            return Err(ConfigError::UnsupportedType {
                parameter: name,
                found: ty.type_name().to_string(),
            });
        }

        let mut param = Self {
            required: formal.default.is_none(),
            default: formal.default.clone(),
            name,
            pretty_name,
            ty,
            description,
            choices,
        };

        if variadic {
            param.ty = ParamType::VariadicList;
            param.required = false;
            param.default = Some(Value::List(Vec::new()));
        }
        Ok(param)
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.type_name()
    }

    pub fn is_variadic(&self) -> bool {
        self.ty == ParamType::VariadicList
    }

    /// Whether a boolean switch for this parameter stores `false` when given.
    pub fn flips_to_false(&self) -> bool {
        self.default.as_ref().is_some_and(Value::is_truthy)
    }
}

fn describe(name: &str, ty: ParamType) -> String {
    format!("Parameter '{}' of {}", name, ty.type_name())
}
