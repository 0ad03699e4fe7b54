use anyhow::Result;
use fncli::{Outcome, Value};
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let app = cli::build_app()?;
    if let Outcome::Completed { value, .. } = app.run()? {
        match value {
            Value::Null => {}
            Value::Text(text) => app.log(text),
            other => app.log(serde_json::to_string(&other)?),
        }
    }
    Ok(())
}
