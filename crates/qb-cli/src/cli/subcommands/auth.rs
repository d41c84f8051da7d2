use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password (or store an email-only session).
    Login(AuthLoginArgs),
    /// Clear the stored session.
    Logout,
    /// Show the current session.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Read the account password from the first line of stdin. Otherwise
    /// `QBANK_AUTH__PASSWORD` is used when set. Without either the session
    /// is email-only and reads use the anonymous key.
    #[arg(long)]
    pub password_stdin: bool,
}
