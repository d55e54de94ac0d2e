#![allow(clippy::enum_variant_names)]

use clap::Parser as _;
use tracing::debug;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;

use crate::{
    application::{Application, ApplicationError},
    cli::Cli,
};

mod application;
mod cli;

#[compio::main]
#[snafu::report]
async fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    let outcome = Application::run(cli_args).await?;
    debug!("Command finished with {outcome:?}");

    Ok(())
}

/// Diagnostics go to stderr so command output on stdout stays pipeable.
/// Only events from this crate pass the filter.
fn setup_tracing(cli_args: &Cli) {
    let level = LevelFilter::from(cli_args.log_level);
    if level == LevelFilter::OFF {
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .compact(),
        )
        .with(Targets::new().with_target(env!("CARGO_CRATE_NAME"), level))
        .init();
}
