//! Shared helpers for command handlers.

use std::collections::HashMap;

use serde::Serialize;
use stman_api::{Device, Error as ApiError, Folder, SyncthingClient};

use crate::error::CliError;

/// Find a configured device by ID or name.
///
/// IDs match case-insensitively. When nothing matches, the input is run
/// through the daemon's ID normalization (which accepts lowercase and
/// undashed forms) and looked up once more.
pub async fn resolve_device(
    client: &SyncthingClient,
    identifier: &str,
) -> Result<Device, CliError> {
    let devices = client.list_devices().await?;
    if let Some(device) = find_device(&devices, identifier) {
        return Ok(device.clone());
    }

    match client.validate_device_id(identifier).await {
        Ok(id) => devices
            .into_iter()
            .find(|d| d.device_id == id)
            .ok_or_else(|| CliError::not_found("device", identifier)),
        Err(ApiError::InvalidDeviceId { .. }) => Err(CliError::not_found("device", identifier)),
        Err(e) => Err(e.into()),
    }
}

/// ID match first, then name.
pub fn find_device<'a>(devices: &'a [Device], identifier: &str) -> Option<&'a Device> {
    devices
        .iter()
        .find(|d| d.device_id.eq_ignore_ascii_case(identifier))
        .or_else(|| devices.iter().find(|d| d.name == identifier))
}

/// Find a configured folder by ID, falling back to its label.
pub async fn resolve_folder(
    client: &SyncthingClient,
    identifier: &str,
) -> Result<Folder, CliError> {
    let folders = client.list_folders().await?;
    find_folder(&folders, identifier)
        .cloned()
        .ok_or_else(|| CliError::not_found("folder", identifier))
}

/// ID match first; among duplicate labels the first configured wins.
pub fn find_folder<'a>(folders: &'a [Folder], identifier: &str) -> Option<&'a Folder> {
    folders
        .iter()
        .find(|f| f.id == identifier)
        .or_else(|| folders.iter().find(|f| f.label == identifier))
}

/// Device ID → display name.
pub fn device_names(devices: &[Device]) -> HashMap<&str, &str> {
    devices
        .iter()
        .map(|d| (d.device_id.as_str(), d.display_name()))
        .collect()
}

/// A remote device a folder is shared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedDevice {
    pub name: String,
    #[serde(rename = "deviceID")]
    pub device_id: String,
}

/// Remote devices a folder is shared with, skipping the local one.
pub fn shared_with(folder: &Folder, names: &HashMap<&str, &str>, my_id: &str) -> Vec<SharedDevice> {
    folder
        .device_ids()
        .filter(|id| *id != my_id)
        .map(|id| SharedDevice {
            name: names
                .get(id)
                .map_or_else(|| short_id(id).to_owned(), |n| (*n).to_owned()),
            device_id: id.to_owned(),
        })
        .collect()
}

/// IDs of the folders shared with `device_id`.
pub fn folders_for_device(folders: &[Folder], device_id: &str) -> Vec<String> {
    folders
        .iter()
        .filter(|f| f.is_shared_with(device_id))
        .map(|f| f.id.clone())
        .collect()
}

/// First group of a device ID, as the daemon's UI abbreviates it.
pub fn short_id(device_id: &str) -> &str {
    device_id.split('-').next().unwrap_or(device_id)
}

/// Comma-join, or `-` when empty.
pub fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".into()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn devices() -> Vec<Device> {
        serde_json::from_value(json!([
            { "deviceID": "AAAAAAA-1111111", "name": "laptop" },
            { "deviceID": "BBBBBBB-2222222", "name": "" },
            { "deviceID": "CCCCCCC-3333333", "name": "AAAAAAA-1111111" },
        ]))
        .unwrap()
    }

    fn folders() -> Vec<Folder> {
        serde_json::from_value(json!([
            { "id": "docs", "label": "photos",
              "devices": [{ "deviceID": "AAAAAAA-1111111" }, { "deviceID": "BBBBBBB-2222222" }] },
            { "id": "photos", "label": "Photos",
              "devices": [{ "deviceID": "BBBBBBB-2222222" }] },
        ]))
        .unwrap()
    }

    #[test]
    fn device_id_wins_over_name() {
        let devices = devices();
        let found = find_device(&devices, "aaaaaaa-1111111").unwrap();
        assert_eq!(found.name, "laptop");
        assert_eq!(find_device(&devices, "laptop").unwrap().device_id, "AAAAAAA-1111111");
        assert!(find_device(&devices, "desktop").is_none());
    }

    #[test]
    fn folder_id_wins_over_label() {
        let folders = folders();
        assert_eq!(find_folder(&folders, "photos").unwrap().id, "photos");
        assert_eq!(find_folder(&folders, "Photos").unwrap().id, "photos");
        assert!(find_folder(&folders, "music").is_none());
    }

    #[test]
    fn shared_with_skips_local_and_falls_back_to_short_id() {
        let devices = devices();
        let names = device_names(&devices);
        let folders = folders();
        assert_eq!(
            shared_with(&folders[0], &names, "AAAAAAA-1111111"),
            vec![SharedDevice {
                name: "BBBBBBB".into(),
                device_id: "BBBBBBB-2222222".into(),
            }]
        );
    }

    #[test]
    fn folders_for_device_lists_ids() {
        assert_eq!(
            folders_for_device(&folders(), "BBBBBBB-2222222"),
            vec!["docs".to_owned(), "photos".to_owned()]
        );
        assert_eq!(join_or_dash(&[]), "-");
    }
}
