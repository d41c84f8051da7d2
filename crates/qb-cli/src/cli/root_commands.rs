use clap::{Args, Subcommand};
use qb_core::enums::LayoutType;

use crate::cli::subcommands::AuthCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and inspect the stored session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Load the question page once and print it.
    Questions(QuestionsArgs),
    /// Browse the question page interactively.
    Browse(BrowseArgs),
}

#[derive(Clone, Debug, Args)]
pub struct QuestionsArgs {
    /// Layout to render: grid or list (defaults to `general.default_layout`).
    #[arg(long)]
    pub layout: Option<LayoutType>,
    /// Open one question in the detail view.
    #[arg(long, value_name = "ID")]
    pub select: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct BrowseArgs {
    /// Layout to start with: grid or list (defaults to `general.default_layout`).
    #[arg(long)]
    pub layout: Option<LayoutType>,
}
