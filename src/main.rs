use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qsim::{cli::Cli, Db};

fn main() -> Result<()> {
    // logs go to stderr; stdout carries the JSON payload only
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = cli.engine_config()?;
    let invocation = cli.invocation();

    let payload = match Db::from_config(config) {
        Ok(db) => db.invoke(&invocation),
        Err(err) => Db::failure(invocation.question.as_deref().unwrap_or_default(), &err),
    };

    println!("{}", serde_json::to_string(&payload)?);
    Ok(())
}
