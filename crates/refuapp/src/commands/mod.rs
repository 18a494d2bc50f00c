//! Command dispatch: bridges CLI args -> registry services -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod images;
pub mod refuges;
pub mod util;

use refuapp_config::Profile;
use refuapp_core::{Registry, Unreachable};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything a registry-bound handler needs.
pub struct Context {
    pub registry: Registry,
    pub profile_name: String,
    /// Active profile with flag overrides applied.
    pub profile: Profile,
}

impl Context {
    /// Map a connectivity failure to the CLI error naming the API URL.
    pub fn offline(&self, err: Unreachable) -> CliError {
        CliError::unreachable(&self.registry.config().api_url, err)
    }
}

/// Dispatch a registry-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Refuges(args) => refuges::handle(ctx, args, global).await,
        Command::Images(args) => images::handle(ctx, args, global).await,
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Logout => auth::logout(ctx, global),
        Command::Status => auth::status(ctx, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
