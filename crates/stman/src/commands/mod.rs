//! Command handlers, one module per subcommand group.

pub mod configure;
pub mod daemon;
pub mod devices;
pub mod folders;
mod util;

use stman_api::SyncthingClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a daemon-facing command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &SyncthingClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Device(args) => devices::handle(client, args, global).await,
        Command::Folder(args) => folders::handle(client, args, global).await,
        Command::Daemon(args) => daemon::handle(client, args, global).await,
        Command::Configure(_) | Command::Profiles | Command::Completions(_) => {
            unreachable!("handled in main before a client is built")
        }
    }
}
