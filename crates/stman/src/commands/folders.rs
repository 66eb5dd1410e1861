//! Folder command handlers.

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use stman_api::{
    Folder, FolderEdit, FolderType, NewFolder, PullOrder, SyncthingClient, VersioningPolicy,
};

use crate::cli::{
    FolderArgs, FolderCommand, FolderEditArgs, FolderTypeArg, GlobalOpts, PullOrderArg,
    VersioningCommand,
};
use crate::error::CliError;
use crate::output;

use super::util::{self, SharedDevice};

/// Daemon defaults; `folder info` only prints settings that differ.
const DEFAULT_RESCAN_INTERVAL_S: u32 = 3600;
const DEFAULT_MIN_DISK_FREE_PCT: f64 = 1.0;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

// ── View model ──────────────────────────────────────────────────────

/// A folder joined with its completion and the names it is shared with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FolderView {
    #[serde(flatten)]
    folder: Folder,
    /// `None` when the daemon could not report status for the folder.
    sync_percent: Option<u32>,
    shared_with: Vec<SharedDevice>,
}

impl FolderView {
    fn sync_label(&self) -> String {
        self.sync_percent
            .map_or_else(|| "-".into(), |pct| format!("{pct}%"))
    }

    fn shared_with_names(&self) -> Vec<String> {
        self.shared_with.iter().map(|d| d.name.clone()).collect()
    }
}

/// Build views for `folders`, one status call per folder.
async fn load_views(
    client: &SyncthingClient,
    folders: Vec<Folder>,
) -> Result<Vec<FolderView>, CliError> {
    let devices = client.list_devices().await?;
    let my_id = client.system_status().await?.my_id;
    let names = util::device_names(&devices);

    let mut views = Vec::with_capacity(folders.len());
    for folder in folders {
        let sync_percent = match client.folder_status(&folder.id).await {
            Ok(status) => Some(status.sync_percent()),
            Err(e) => {
                warn!(folder = %folder.id, error = %e, "folder status unavailable");
                None
            }
        };
        let shared_with = util::shared_with(&folder, &names, &my_id);
        views.push(FolderView {
            folder,
            sync_percent,
            shared_with,
        });
    }
    Ok(views)
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "Folder")]
    name: String,
    #[tabled(rename = "Sync")]
    sync: String,
    #[tabled(rename = "Shared With")]
    shared_with: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Path")]
    path: String,
}

impl From<&FolderView> for FolderRow {
    fn from(v: &FolderView) -> Self {
        Self {
            name: v.folder.display_name().to_owned(),
            sync: v.sync_label(),
            shared_with: util::join_or_dash(&v.shared_with_names()),
            id: v.folder.id.clone(),
            path: v.folder.path.clone(),
        }
    }
}

fn detail(v: &FolderView) -> String {
    let f = &v.folder;
    let shared: Vec<String> = v
        .shared_with
        .iter()
        .map(|d| format!("{} ({})", d.name, d.device_id))
        .collect();

    let mut lines = vec![
        output::field("Folder", f.display_name()),
        output::field("Sync", v.sync_label()),
        output::field("Shared With", util::join_or_dash(&shared)),
        output::field("Folder ID", &f.id),
        output::field("Folder Path", &f.path),
    ];
    lines.extend(non_default_lines(f));
    lines.join("\n")
}

/// Advanced settings that differ from the daemon defaults.
fn non_default_lines(f: &Folder) -> Vec<String> {
    let mut lines = Vec::new();
    if f.rescan_interval_s != DEFAULT_RESCAN_INTERVAL_S {
        lines.push(output::field(
            "Rescan Interval",
            format!("{}s", f.rescan_interval_s),
        ));
    }
    if f.folder_type != FolderType::SendReceive {
        lines.push(output::field("Folder Type", f.folder_type));
    }
    if f.order != PullOrder::Random {
        lines.push(output::field("File Pull Order", f.order));
    }
    if let Some(size) = &f.min_disk_free {
        let is_default =
            size.unit == "%" && (size.value - DEFAULT_MIN_DISK_FREE_PCT).abs() < f64::EPSILON;
        if !is_default {
            lines.push(output::field(
                "Min Disk Free",
                format!("{}{}", size.value, size.unit),
            ));
        }
    }
    if f.ignore_perms {
        lines.push(output::field("Ignore Permissions", "yes"));
    }

    let v = &f.versioning;
    if v.is_enabled() {
        lines.push(output::field("Versioning", &v.kind));
        let param = |key: &str| v.param(key).unwrap_or("-").to_owned();
        match v.kind.as_str() {
            "trashcan" => lines.push(output::field(
                "Clean Out After",
                format!("{} days", param("cleanoutDays")),
            )),
            "simple" => lines.push(output::field("Keep Versions", param("keep"))),
            "staggered" => {
                let max_age = v
                    .param("maxAge")
                    .and_then(|s| s.parse::<u64>().ok())
                    .map_or_else(|| "-".into(), |secs| format!("{} days", secs / SECONDS_PER_DAY));
                lines.push(output::field("Max Age", max_age));
                if let Some(path) = v.param("versionsPath").filter(|p| !p.is_empty()) {
                    lines.push(output::field("Versions Path", path));
                }
            }
            "external" => lines.push(output::field("Command", param("command"))),
            _ => {}
        }
    }
    lines
}

// ── Argument mapping ────────────────────────────────────────────────

impl From<FolderTypeArg> for FolderType {
    fn from(arg: FolderTypeArg) -> Self {
        match arg {
            FolderTypeArg::SendReceive => Self::SendReceive,
            FolderTypeArg::SendOnly => Self::SendOnly,
            FolderTypeArg::ReceiveOnly => Self::ReceiveOnly,
            FolderTypeArg::ReceiveEncrypted => Self::ReceiveEncrypted,
        }
    }
}

impl From<PullOrderArg> for PullOrder {
    fn from(arg: PullOrderArg) -> Self {
        match arg {
            PullOrderArg::Random => Self::Random,
            PullOrderArg::Alphabetic => Self::Alphabetic,
            PullOrderArg::SmallestFirst => Self::SmallestFirst,
            PullOrderArg::LargestFirst => Self::LargestFirst,
            PullOrderArg::OldestFirst => Self::OldestFirst,
            PullOrderArg::NewestFirst => Self::NewestFirst,
        }
    }
}

impl From<VersioningCommand> for VersioningPolicy {
    fn from(cmd: VersioningCommand) -> Self {
        match cmd {
            VersioningCommand::Trashcan { cleanout } => Self::Trashcan {
                cleanout_days: cleanout,
            },
            VersioningCommand::Simple { versions } => Self::Simple { keep: versions },
            VersioningCommand::Staggered { maxage, path } => Self::Staggered {
                max_age_days: maxage,
                versions_path: path,
            },
            VersioningCommand::External { command } => Self::External { command },
            VersioningCommand::None => Self::None,
        }
    }
}

fn collect_edits(args: &FolderEditArgs) -> Vec<FolderEdit> {
    let mut edits = Vec::new();
    if let Some(label) = &args.label {
        edits.push(FolderEdit::Label(label.clone()));
    }
    if let Some(secs) = args.rescan {
        edits.push(FolderEdit::RescanInterval(secs));
    }
    if let Some(pct) = args.minfree {
        edits.push(FolderEdit::MinDiskFreePct(f64::from(pct)));
    }
    if let Some(t) = args.folder_type {
        edits.push(FolderEdit::Type(t.into()));
    }
    if let Some(o) = args.order {
        edits.push(FolderEdit::Order(o.into()));
    }
    if args.ignore_permissions {
        edits.push(FolderEdit::IgnorePerms(true));
    }
    if args.sync_permissions {
        edits.push(FolderEdit::IgnorePerms(false));
    }
    edits
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    client: &SyncthingClient,
    args: FolderArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FolderCommand::List => {
            let folders = client.list_folders().await?;
            let views = load_views(client, folders).await?;
            let out = output::render_list(
                global.output,
                &views,
                |v| FolderRow::from(v),
                |v| v.folder.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::Info { folder } => {
            let found = util::resolve_folder(client, &folder).await?;
            let mut views = load_views(client, vec![found]).await?;
            let Some(view) = views.pop() else {
                return Err(CliError::not_found("folder", &folder));
            };
            let out = output::render_single(global.output, &view, detail, |v| {
                v.folder.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::Add(add) => {
            let path = std::path::absolute(&add.path)?;
            let folder = NewFolder {
                id: add.folder_id,
                label: add.label.unwrap_or_default(),
                path: path.to_string_lossy().into_owned(),
                folder_type: add.folder_type.map(Into::into),
                rescan_interval_s: add.rescan_interval,
            };
            client.add_folder(&folder).await?;
            output::print_done(
                &format!("Added folder {} at {}", folder.id, folder.path),
                global.quiet,
            );
            Ok(())
        }

        FolderCommand::Remove { folder } => {
            let found = util::resolve_folder(client, &folder).await?;
            client.remove_folder(&found.id).await?;
            output::print_done(
                &format!("Removed folder {} ({})", found.display_name(), found.id),
                global.quiet,
            );
            Ok(())
        }

        FolderCommand::Share { folder, device } => {
            let f = util::resolve_folder(client, &folder).await?;
            let d = util::resolve_device(client, &device).await?;
            client.share_folder(&f.id, &d.device_id).await?;
            output::print_done(
                &format!("Shared {} with {}", f.display_name(), d.display_name()),
                global.quiet,
            );
            Ok(())
        }

        FolderCommand::Unshare { folder, device } => {
            let f = util::resolve_folder(client, &folder).await?;
            let d = util::resolve_device(client, &device).await?;
            client.unshare_folder(&f.id, &d.device_id).await?;
            output::print_done(
                &format!("Stopped sharing {} with {}", f.display_name(), d.display_name()),
                global.quiet,
            );
            Ok(())
        }

        FolderCommand::Edit(edit) => {
            let edits = collect_edits(&edit);
            if edits.is_empty() {
                return Err(CliError::Validation {
                    field: "folder edit".into(),
                    reason: "nothing to change; pass at least one setting flag".into(),
                });
            }
            let found = util::resolve_folder(client, &edit.folder).await?;
            let updated = client.edit_folder(&found.id, &edits).await?;
            output::print_done(
                &format!("Updated folder {}", updated.display_name()),
                global.quiet,
            );
            Ok(())
        }

        FolderCommand::Versioning(args) => {
            let found = util::resolve_folder(client, &args.folder).await?;
            let policy = VersioningPolicy::from(args.strategy);
            let updated = client.set_versioning(&found.id, &policy).await?;
            let kind = if updated.versioning.is_enabled() {
                updated.versioning.kind.as_str()
            } else {
                "none"
            };
            output::print_done(
                &format!("Versioning of {} set to {kind}", updated.display_name()),
                global.quiet,
            );
            Ok(())
        }
    }
}
