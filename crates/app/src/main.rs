use clap::Parser;

mod cli;
mod commands;
mod convert;
mod error;
mod settings;
mod store;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref(), cli.ledger)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "settleup={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut engine = store::load(&settings.ledger.path)?;
    let outcome = match commands::run(&mut engine, cli.command) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("{err}");
            return Err(err.into());
        }
    };

    if outcome.mutated {
        store::save(&settings.ledger.path, &engine, settings.ledger.pretty)?;
    }

    let rendered = if settings.ledger.pretty {
        serde_json::to_string_pretty(&outcome.output)?
    } else {
        serde_json::to_string(&outcome.output)?
    };
    println!("{rendered}");

    Ok(())
}
