mod cli;
mod config;
mod main_lib;


use clap::Parser;
use cli::Cli;
use config::Config;
use main_lib::{init_tracing, load_settings, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);
    let settings = load_settings(&config)?;
    tracing::debug!("Using currency unit {}", settings.currency_unit);

    let output = run(cli, &settings)?;
    print!("{}", output);
    Ok(())
}
