mod catalog;
mod cli;
mod commands;
mod config;
mod constants;
mod error;
mod sources;
mod throttle;
mod ui;
mod version;

use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, Overrides};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default_filter = format!("warn,labext_catalog={}", level);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?
        .apply(Overrides {
            base_url: cli.base_url,
            stats_url: cli.stats_url,
            throttle: cli.throttle,
            timeout: cli.timeout,
        })
        .validate()?;

    match cli.command {
        Commands::Build { output } => commands::build::build(&config, &output).await?,
        Commands::List => commands::list::list(&config).await?,
    }

    Ok(())
}
