//! Command dispatch: bridges CLI args -> `ClientManager` flows -> output.

pub mod clients;
pub mod config_cmd;
pub mod groups;
pub mod util;

use clientele_core::ClientManager;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    manager: &ClientManager,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Clients(args) => clients::handle(manager, args, global).await,
        Command::Groups(args) => groups::handle(manager, args, global).await,
        // Handled before a manager is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
