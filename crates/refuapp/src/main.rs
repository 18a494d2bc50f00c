mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use refuapp_config::FileStore;
use refuapp_core::Registry;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the registry
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "refuapp", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let ctx = build_context(&cli.global)?;
            tracing::debug!(command = ?cmd, profile = %ctx.profile_name, "dispatching command");
            commands::dispatch(cmd, &ctx, &cli.global).await
        }
    }
}

/// Resolve the profile and build the one `Registry` of this process.
fn build_context(global: &cli::GlobalOpts) -> Result<Context, CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = config::effective_profile(global, &cfg, &profile_name)?;
    let client_config = refuapp_config::profile_to_client_config(&profile, &cfg.defaults)?;

    let store = Arc::new(FileStore::for_profile(&profile_name));
    let registry = Registry::new(client_config, store)?;

    Ok(Context {
        registry,
        profile_name,
        profile,
    })
}
