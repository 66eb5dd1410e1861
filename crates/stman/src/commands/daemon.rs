//! `daemon` handler: pause and resume synchronization.

use stman_api::SyncthingClient;

use crate::cli::{DaemonArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// Apply the requested actions in a fixed order: pause, resume, pause-all,
/// resume-all.
pub async fn handle(
    client: &SyncthingClient,
    args: DaemonArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(device) = &args.pause {
        let d = util::resolve_device(client, device).await?;
        client.pause(Some(&d.device_id)).await?;
        output::print_done(&format!("Paused {}", d.display_name()), global.quiet);
    }
    if let Some(device) = &args.resume {
        let d = util::resolve_device(client, device).await?;
        client.resume(Some(&d.device_id)).await?;
        output::print_done(&format!("Resumed {}", d.display_name()), global.quiet);
    }
    if args.pause_all {
        client.pause(None).await?;
        output::print_done("Paused all devices", global.quiet);
    }
    if args.resume_all {
        client.resume(None).await?;
        output::print_done("Resumed all devices", global.quiet);
    }
    Ok(())
}
