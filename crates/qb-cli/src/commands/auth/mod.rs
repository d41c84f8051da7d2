mod login;
mod logout;
mod status;

use anyhow::Context;
use qb_auth::SessionStore;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `qbank auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &qb_config::QbConfig,
) -> anyhow::Result<()> {
    let store = SessionStore::default_location().context("failed to locate session store")?;
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config, &store).await,
        AuthCommands::Logout => logout::handle(flags, &store),
        AuthCommands::Status => status::handle(flags, config, &store),
    }
}
