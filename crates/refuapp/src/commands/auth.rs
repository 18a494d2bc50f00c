//! Login, logout and session status.

use std::fmt::Write as _;
use std::io::IsTerminal;

use refuapp_config::ConfigError;
use secrecy::SecretString;
use serde::Serialize;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::{self, CliError};
use crate::output;

use super::{Context, util};

/// Password from the credential chain, else an interactive prompt.
fn password(ctx: &Context) -> Result<SecretString, CliError> {
    match refuapp_config::resolve_password(&ctx.profile, &ctx.profile_name) {
        Ok(secret) => Ok(secret),
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            let typed = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
            if typed.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            Ok(SecretString::from(typed))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username {
        Some(username) => username,
        None => refuapp_config::resolve_username(&ctx.profile, &ctx.profile_name)?,
    };
    let password = password(ctx)?;

    let auth = ctx.registry.auth();
    let token = auth
        .login(&username, &password)
        .await
        .map_err(|e| ctx.offline(e))?
        .into_result()
        .map_err(|e| error::authentication(&ctx.profile_name, e))?;
    auth.authenticate(&token)?;

    if !global.quiet {
        eprintln!(
            "✓ Logged in as '{username}' (profile '{}')",
            ctx.profile_name
        );
    }
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.registry.auth().deauthenticate()?;
    if !global.quiet {
        eprintln!("✓ Session token removed for profile '{}'", ctx.profile_name);
    }
    Ok(())
}

#[derive(Serialize)]
struct Status {
    profile: String,
    api_url: String,
    authenticated: bool,
    session_file: String,
}

pub fn status(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status {
        profile: ctx.profile_name.clone(),
        api_url: ctx.registry.config().api_url.to_string(),
        authenticated: ctx.registry.auth().is_authenticated()?,
        session_file: refuapp_config::session_path().display().to_string(),
    };
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            let session = if s.authenticated {
                output::good("logged in", color)
            } else {
                output::bad("not logged in", color)
            };
            let mut out = String::new();
            let _ = writeln!(out, "Profile:  {}", s.profile);
            let _ = writeln!(out, "API:      {}", s.api_url);
            let _ = write!(out, "Session:  {session}");
            out
        },
        |s| s.authenticated.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
