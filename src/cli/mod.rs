//! Example commands wired into the `fncli` binary.
//!
//! Each command is a plain function plus a declaration of its parameters;
//! [`build_app`] registers them all.

use anyhow::{Result, anyhow};
use fncli::{App, Arguments, FormalParam, Function, ParamType, ParameterAnnotation, Value};

/// Assemble the demo application.
pub fn build_app() -> Result<App> {
    let mut app = App::new(
        "fncli",
        "Functions turned into subcommands.
        Run a command with --help to see its parameters.",
    )
    .version(env!("CARGO_PKG_VERSION"));

    app.register(echo())?;
    app.register(sum())?;
    app.register(concat())?;
    app.register(greet())?;
    app.register(count_down())?;
    Ok(app)
}

fn text<'a>(args: &'a Arguments, index: usize) -> Result<&'a str> {
    args.arg(index)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("argument {} is not text", index))
}

fn echo() -> Function {
    Function::new("echo", |args| {
        let msg = text(&args, 0)?;
        let cap = args.kwarg("cap").is_some_and(Value::is_truthy);
        Ok(Value::from(if cap {
            msg.to_uppercase()
        } else {
            msg.to_string()
        }))
    })
    .doc(
        "Echo a message

        Prints the message back, optionally in capitals.",
    )
    .param(FormalParam::new("msg").annotated(
        ParameterAnnotation::new("MESSAGE", ParamType::Text).description("Message to print"),
    ))
    .param(
        FormalParam::new("cap")
            .annotated(
                ParameterAnnotation::new("Capitalize", ParamType::Boolean)
                    .description("Print the message in capitals"),
            )
            .default(false),
    )
}

fn sum() -> Function {
    Function::new("sum", |args| {
        let a = args.arg(0).and_then(Value::as_f64).unwrap_or_default();
        let b = args.arg(1).and_then(Value::as_f64).unwrap_or_default();
        let prec = args.kwarg("prec").and_then(Value::as_i64).unwrap_or(2);
        let prec = usize::try_from(prec).map_err(|_| anyhow!("precision must not be negative"))?;
        Ok(Value::from(format!("{:.*}", prec, a + b)))
    })
    .doc("Add two numbers")
    .param(FormalParam::new("a").annotated(
        ParameterAnnotation::new("Addend1", ParamType::Float).description("First addend."),
    ))
    .param(FormalParam::new("b").annotated(
        ParameterAnnotation::new("Addend2", ParamType::Float).description("Second addend."),
    ))
    .param(
        FormalParam::new("prec")
            .annotated(
                ParameterAnnotation::new("Precision", ParamType::Integer)
                    .description("Result decimal precision"),
            )
            .default(2),
    )
}

fn concat() -> Function {
    Function::new("concat", |args| {
        let sep = args
            .kwarg("sep")
            .and_then(Value::as_str)
            .unwrap_or(" ")
            .to_string();
        let words: Vec<String> = args.positional.iter().map(Value::to_string).collect();
        Ok(Value::from(words.join(&sep)))
    })
    .doc("Join words with a separator")
    .param(FormalParam::new("sep").default(" "))
    .param(FormalParam::variadic("words"))
}

fn greet() -> Function {
    Function::new("greet", |args| {
        let name = text(&args, 0)?;
        let greeting = args
            .kwarg("greeting")
            .and_then(Value::as_str)
            .unwrap_or("hello");
        let mut line = format!("{greeting}, {name}");
        if args.kwarg("loud").is_some_and(Value::is_truthy) {
            line = line.to_uppercase() + "!";
        }
        Ok(Value::from(line))
    })
    .doc("Greet someone")
    .param(FormalParam::new("name"))
    .param(
        FormalParam::new("greeting")
            .annotated(
                ParameterAnnotation::new("Greeting", ParamType::Text)
                    .description("Word to greet with")
                    .choices(["hello", "hi", "hey"]),
            )
            .default("hello"),
    )
    .param(FormalParam::new("loud").default(false))
}

fn count_down() -> Function {
    Function::new("count_down", |args| {
        let start = args.kwarg("start").and_then(Value::as_i64).unwrap_or(3);
        let skip_zero = args.kwarg("skip_zero").is_some_and(Value::is_truthy);
        let floor = if skip_zero { 1 } else { 0 };
        let steps: Vec<Value> = (floor..=start).rev().map(Value::from).collect();
        Ok(Value::List(steps))
    })
    .doc(
        "Count down from --start.
        Zero is left out unless --skip_zero is passed.",
    )
    .param(FormalParam::new("start").default(3))
    .param(FormalParam::new("skip_zero").default(true))
}
