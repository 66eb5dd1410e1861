// Syncthing REST API response types
//
// Config objects (`Device`, `Folder`) are read, modified and written back
// whole, so each keeps every field we don't model in a flattened `extra`
// map. Anything the daemon sends survives a round trip untouched.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Enumerations ─────────────────────────────────────────────────────

/// Wire compression setting for a device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Compression {
    Always,
    #[default]
    Metadata,
    Never,
}

/// Folder synchronization direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FolderType {
    #[default]
    SendReceive,
    SendOnly,
    ReceiveOnly,
    ReceiveEncrypted,
}

/// Order in which needed files are pulled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PullOrder {
    #[default]
    Random,
    Alphabetic,
    SmallestFirst,
    LargestFirst,
    OldestFirst,
    NewestFirst,
}

// ── Device ───────────────────────────────────────────────────────────

/// A configured remote (or local) device from `/rest/config/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub compression: Compression,
    #[serde(default)]
    pub introducer: bool,
    #[serde(default)]
    pub paused: bool,
    /// Fields not modelled above, sent back verbatim on update.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Name if set, otherwise the first group of the device ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.device_id.split('-').next().unwrap_or(&self.device_id)
        } else {
            &self.name
        }
    }
}

/// Body of `POST /rest/config/devices`. The daemon fills unset fields
/// from its device defaults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub addresses: Vec<String>,
    pub introducer: bool,
}

/// A single change applied to a device during read-modify-write.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEdit {
    Name(String),
    AddAddress(String),
    RemoveAddress(String),
    Compression(Compression),
    Introducer(bool),
}

impl DeviceEdit {
    pub fn apply(&self, device: &mut Device) {
        match self {
            Self::Name(name) => device.name.clone_from(name),
            Self::AddAddress(addr) => {
                if !device.addresses.contains(addr) {
                    device.addresses.push(addr.clone());
                }
            }
            Self::RemoveAddress(addr) => device.addresses.retain(|a| a != addr),
            Self::Compression(c) => device.compression = *c,
            Self::Introducer(on) => device.introducer = *on,
        }
    }
}

// ── Folder ───────────────────────────────────────────────────────────

/// A device entry inside a folder's share list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDevice {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FolderDevice {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            extra: Map::new(),
        }
    }
}

/// A size with unit, as used by `minDiskFree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

/// Versioning block of a folder config.
///
/// `kind` is the empty string when versioning is off. Params are always
/// strings on the wire, even for numeric settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Versioning {
    pub fn is_enabled(&self) -> bool {
        !self.kind.is_empty()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// A versioning strategy with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersioningPolicy {
    None,
    /// Move deleted files to `.stversions`, purging after `cleanout_days` (0 = never).
    Trashcan { cleanout_days: u32 },
    /// Keep the last `keep` versions of each file.
    Simple { keep: u32 },
    /// Thin out old versions, dropping those older than `max_age_days`.
    Staggered { max_age_days: u32, versions_path: String },
    /// Hand versioning to an external command.
    External { command: String },
}

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

impl VersioningPolicy {
    /// Overwrite the type and params of `versioning`, keeping other fields.
    pub fn apply(&self, versioning: &mut Versioning) {
        let (kind, params): (&str, Vec<(&str, String)>) = match self {
            Self::None => ("", Vec::new()),
            Self::Trashcan { cleanout_days } => {
                ("trashcan", vec![("cleanoutDays", cleanout_days.to_string())])
            }
            Self::Simple { keep } => ("simple", vec![("keep", keep.to_string())]),
            Self::Staggered {
                max_age_days,
                versions_path,
            } => (
                "staggered",
                vec![
                    (
                        "maxAge",
                        (u64::from(*max_age_days) * SECONDS_PER_DAY).to_string(),
                    ),
                    ("cleanInterval", "3600".to_owned()),
                    ("versionsPath", versions_path.clone()),
                ],
            ),
            Self::External { command } => ("external", vec![("command", command.clone())]),
        };
        versioning.kind = kind.to_owned();
        versioning.params = params
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
    }
}

/// A configured folder from `/rest/config/folders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub folder_type: FolderType,
    #[serde(default)]
    pub devices: Vec<FolderDevice>,
    #[serde(rename = "rescanIntervalS", default)]
    pub rescan_interval_s: u32,
    #[serde(default)]
    pub order: PullOrder,
    #[serde(default)]
    pub versioning: Versioning,
    #[serde(default)]
    pub ignore_perms: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_disk_free: Option<Size>,
    #[serde(default)]
    pub paused: bool,
    /// Fields not modelled above, sent back verbatim on update.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Folder {
    /// Label if set, otherwise the folder ID.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    pub fn is_shared_with(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d.device_id == device_id)
    }

    /// IDs of the devices this folder is shared with.
    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.device_id.as_str())
    }
}

/// Body of `POST /rest/config/folders`. Unset fields take the daemon's
/// folder defaults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFolder {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    pub path: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<FolderType>,
    #[serde(rename = "rescanIntervalS", skip_serializing_if = "Option::is_none")]
    pub rescan_interval_s: Option<u32>,
}

/// A single change applied to a folder during read-modify-write.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderEdit {
    Label(String),
    RescanInterval(u32),
    MinDiskFreePct(f64),
    Type(FolderType),
    Order(PullOrder),
    IgnorePerms(bool),
}

impl FolderEdit {
    pub fn apply(&self, folder: &mut Folder) {
        match self {
            Self::Label(label) => folder.label.clone_from(label),
            Self::RescanInterval(secs) => folder.rescan_interval_s = *secs,
            Self::MinDiskFreePct(pct) => {
                folder.min_disk_free = Some(Size {
                    value: *pct,
                    unit: "%".into(),
                });
            }
            Self::Type(t) => folder.folder_type = *t,
            Self::Order(o) => folder.order = *o,
            Self::IgnorePerms(on) => folder.ignore_perms = *on,
        }
    }
}

// ── System / DB ──────────────────────────────────────────────────────

/// Subset of `/rest/system/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(rename = "myID")]
    pub my_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/rest/system/connections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connections {
    #[serde(default)]
    pub connections: HashMap<String, Connection>,
}

impl Connections {
    pub fn get(&self, device_id: &str) -> Option<&Connection> {
        self.connections.get(device_id)
    }
}

/// Live connection state of one device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub client_version: String,
}

/// Subset of `/rest/db/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderStatus {
    #[serde(default)]
    pub global_bytes: u64,
    #[serde(default)]
    pub in_sync_bytes: u64,
    #[serde(default)]
    pub state: String,
}

impl FolderStatus {
    /// Completion as a whole percentage, rounded down. An empty folder is 100%.
    pub fn sync_percent(&self) -> u32 {
        if self.global_bytes == 0 {
            return 100;
        }
        let pct = u128::from(self.in_sync_bytes) * 100 / u128::from(self.global_bytes);
        u32::try_from(pct.min(100)).unwrap_or(100)
    }
}

/// `/rest/svc/deviceid` answers either `{"id": ...}` or `{"error": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceIdResponse {
    pub id: Option<String>,
    pub error: Option<String>,
}
