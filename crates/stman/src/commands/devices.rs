//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use stman_api::{
    Compression, Connections, Device, DeviceEdit, Folder, NewDevice, SyncthingClient,
};

use crate::cli::{CompressionArg, DeviceArgs, DeviceCommand, DeviceEditArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Tint};

use super::util;

// ── View model ──────────────────────────────────────────────────────

/// Where a device stands relative to this daemon. Variant order is the
/// listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    #[strum(to_string = "This Device")]
    Local,
    Connected,
    Paused,
    Disconnected,
}

impl LinkState {
    fn classify(device: &Device, my_id: &str, connections: &Connections) -> Self {
        if device.device_id == my_id {
            return Self::Local;
        }
        let conn = connections.get(&device.device_id);
        if device.paused || conn.is_some_and(|c| c.paused) {
            Self::Paused
        } else if conn.is_some_and(|c| c.connected) {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }

    fn tint(self) -> Tint {
        match self {
            Self::Local => Tint::Muted,
            Self::Connected => Tint::Good,
            Self::Paused => Tint::Warn,
            Self::Disconnected => Tint::Bad,
        }
    }
}

/// A configured device joined with its live connection and folder shares.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceView {
    #[serde(flatten)]
    device: Device,
    state: LinkState,
    /// Address of the live connection, if any.
    connected_address: Option<String>,
    folders: Vec<String>,
}

impl DeviceView {
    fn new(device: Device, my_id: &str, connections: &Connections, folders: &[Folder]) -> Self {
        let state = LinkState::classify(&device, my_id, connections);
        let connected_address = connections
            .get(&device.device_id)
            .filter(|c| c.connected && !c.address.is_empty())
            .map(|c| c.address.clone());
        let folders = util::folders_for_device(folders, &device.device_id);
        Self {
            device,
            state,
            connected_address,
            folders,
        }
    }

    /// Live address when connected, configured addresses otherwise.
    fn address(&self) -> String {
        match &self.connected_address {
            Some(addr) => addr.clone(),
            None if self.state == LinkState::Local => "-".into(),
            None => util::join_or_dash(&self.device.addresses),
        }
    }
}

/// Local device first, then connected, paused, disconnected; config order
/// within each group.
fn sort_views(views: &mut [DeviceView]) {
    views.sort_by_key(|v| v.state);
}

/// Everything the device views need, in four sequential calls.
struct Snapshot {
    devices: Vec<Device>,
    connections: Connections,
    my_id: String,
    folders: Vec<Folder>,
}

impl Snapshot {
    async fn fetch(client: &SyncthingClient) -> Result<Self, CliError> {
        let devices = client.list_devices().await?;
        let connections = client.connections().await?;
        let my_id = client.system_status().await?.my_id;
        let folders = client.list_folders().await?;
        Ok(Self {
            devices,
            connections,
            my_id,
            folders,
        })
    }

    fn view(&self, device: Device) -> DeviceView {
        DeviceView::new(device, &self.my_id, &self.connections, &self.folders)
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Folders")]
    folders: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl DeviceRow {
    fn from_view(v: &DeviceView, color: bool) -> Self {
        Self {
            name: v.device.display_name().to_owned(),
            state: output::paint(&v.state.to_string(), v.state.tint(), color),
            address: v.address(),
            folders: util::join_or_dash(&v.folders),
            id: v.device.device_id.clone(),
        }
    }
}

fn detail(v: &DeviceView, color: bool) -> String {
    let d = &v.device;
    let mut lines = vec![
        output::field("Name", d.display_name()),
        output::field("ID", &d.device_id),
        output::field("State", output::paint(&v.state.to_string(), v.state.tint(), color)),
    ];
    if let Some(addr) = &v.connected_address {
        lines.push(output::field("Connected At", addr));
    }
    lines.push(output::field("Addresses", util::join_or_dash(&d.addresses)));
    lines.push(output::field("Folders", util::join_or_dash(&v.folders)));
    lines.push(output::field("Compression", d.compression));
    lines.push(output::field("Introducer", yes_no(d.introducer)));
    lines.join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

// ── Edits ───────────────────────────────────────────────────────────

impl From<CompressionArg> for Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Always => Self::Always,
            CompressionArg::Metadata => Self::Metadata,
            CompressionArg::Never => Self::Never,
        }
    }
}

fn collect_edits(args: &DeviceEditArgs) -> Vec<DeviceEdit> {
    let mut edits = Vec::new();
    if let Some(name) = &args.name {
        edits.push(DeviceEdit::Name(name.clone()));
    }
    edits.extend(args.add_address.iter().cloned().map(DeviceEdit::AddAddress));
    edits.extend(
        args.remove_address
            .iter()
            .cloned()
            .map(DeviceEdit::RemoveAddress),
    );
    if let Some(c) = args.compression {
        edits.push(DeviceEdit::Compression(c.into()));
    }
    if args.introducer {
        edits.push(DeviceEdit::Introducer(true));
    }
    if args.no_introducer {
        edits.push(DeviceEdit::Introducer(false));
    }
    edits
}

/// Given addresses, plus `dynamic` when asked for or when none were given.
fn initial_addresses(addresses: &[String], dynamic: bool) -> Vec<String> {
    let mut out = addresses.to_vec();
    if (dynamic || out.is_empty()) && !out.iter().any(|a| a == "dynamic") {
        out.push("dynamic".into());
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &SyncthingClient,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        DeviceCommand::List => {
            let snap = Snapshot::fetch(client).await?;
            let mut views: Vec<DeviceView> =
                snap.devices.iter().cloned().map(|d| snap.view(d)).collect();
            sort_views(&mut views);

            let out = output::render_list(
                global.output,
                &views,
                |v| DeviceRow::from_view(v, color),
                |v| v.device.device_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DeviceCommand::Info { device } => {
            let found = util::resolve_device(client, &device).await?;
            let snap = Snapshot::fetch(client).await?;
            let view = snap.view(found);

            let out = output::render_single(
                global.output,
                &view,
                |v| detail(v, color),
                |v| v.device.device_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DeviceCommand::Add(add) => {
            let id = client
                .add_device(NewDevice {
                    device_id: add.device_id,
                    name: add.name.unwrap_or_default(),
                    addresses: initial_addresses(&add.address, add.dynamic),
                    introducer: add.introducer,
                })
                .await?;
            output::print_done(&format!("Added device {id}"), global.quiet);
            Ok(())
        }

        DeviceCommand::Remove { device } => {
            let found = util::resolve_device(client, &device).await?;
            client.remove_device(&found.device_id).await?;
            output::print_done(
                &format!("Removed device {} ({})", found.display_name(), found.device_id),
                global.quiet,
            );
            Ok(())
        }

        DeviceCommand::Edit(edit) => {
            let edits = collect_edits(&edit);
            if edits.is_empty() {
                return Err(CliError::Validation {
                    field: "device edit".into(),
                    reason: "nothing to change; pass at least one setting flag".into(),
                });
            }
            let found = util::resolve_device(client, &edit.device).await?;
            let updated = client.edit_device(&found.device_id, &edits).await?;
            output::print_done(
                &format!("Updated device {}", updated.display_name()),
                global.quiet,
            );
            Ok(())
        }
    }
}
