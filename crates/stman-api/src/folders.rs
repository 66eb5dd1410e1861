// Folder configuration endpoints
//
// CRUD on `/rest/config/folders` plus the sharing, versioning and settings
// updates, all of which go through `update_folder`.

use tracing::debug;

use crate::client::SyncthingClient;
use crate::error::Error;
use crate::models::{Folder, FolderDevice, FolderEdit, NewFolder, VersioningPolicy};

impl SyncthingClient {
    /// List all configured folders.
    ///
    /// `GET /rest/config/folders`
    pub async fn list_folders(&self) -> Result<Vec<Folder>, Error> {
        let url = self.rest_url(&["config", "folders"])?;
        self.get(url).await
    }

    /// Fetch one folder by ID.
    ///
    /// `GET /rest/config/folders/{id}`
    pub async fn get_folder(&self, folder_id: &str) -> Result<Folder, Error> {
        let url = self.rest_url(&["config", "folders", folder_id])?;
        self.get(url).await
    }

    /// Add a folder. An existing folder with the same ID yields
    /// [`Error::Conflict`]; labels may repeat.
    ///
    /// `POST /rest/config/folders`
    pub async fn add_folder(&self, folder: &NewFolder) -> Result<(), Error> {
        match self.get_folder(&folder.id).await {
            Ok(_) => {
                return Err(Error::Conflict {
                    kind: "Folder",
                    id: folder.id.clone(),
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        debug!(folder_id = %folder.id, path = %folder.path, "adding folder");
        let url = self.rest_url(&["config", "folders"])?;
        self.post(url, folder).await
    }

    /// Remove a folder from the configuration. Files on disk are untouched.
    ///
    /// `DELETE /rest/config/folders/{id}`
    pub async fn remove_folder(&self, folder_id: &str) -> Result<(), Error> {
        debug!(folder_id, "removing folder");
        let url = self.rest_url(&["config", "folders", folder_id])?;
        self.delete(url).await
    }

    /// Replace a folder's configuration.
    ///
    /// `PUT /rest/config/folders/{id}`
    pub async fn put_folder(&self, folder: &Folder) -> Result<(), Error> {
        let url = self.rest_url(&["config", "folders", folder.id.as_str()])?;
        self.put(url, folder).await
    }

    /// Fetch a folder, apply `mutate`, and write the full object back.
    ///
    /// If `mutate` fails nothing is written.
    pub async fn update_folder<F>(&self, folder_id: &str, mutate: F) -> Result<Folder, Error>
    where
        F: FnOnce(&mut Folder) -> Result<(), Error>,
    {
        let mut folder = self.get_folder(folder_id).await?;
        mutate(&mut folder)?;
        self.put_folder(&folder).await?;
        Ok(folder)
    }

    /// Add a device to a folder's share list.
    pub async fn share_folder(&self, folder_id: &str, device_id: &str) -> Result<Folder, Error> {
        debug!(folder_id, device_id, "sharing folder");
        self.update_folder(folder_id, |folder| {
            if folder.is_shared_with(device_id) {
                return Err(Error::AlreadyShared {
                    folder: folder.id.clone(),
                    device: device_id.to_owned(),
                });
            }
            folder.devices.push(FolderDevice::new(device_id));
            Ok(())
        })
        .await
    }

    /// Remove a device from a folder's share list.
    pub async fn unshare_folder(&self, folder_id: &str, device_id: &str) -> Result<Folder, Error> {
        debug!(folder_id, device_id, "unsharing folder");
        self.update_folder(folder_id, |folder| {
            if !folder.is_shared_with(device_id) {
                return Err(Error::NotShared {
                    folder: folder.id.clone(),
                    device: device_id.to_owned(),
                });
            }
            folder.devices.retain(|d| d.device_id != device_id);
            Ok(())
        })
        .await
    }

    /// Replace the folder's versioning strategy.
    pub async fn set_versioning(
        &self,
        folder_id: &str,
        policy: &VersioningPolicy,
    ) -> Result<Folder, Error> {
        debug!(folder_id, ?policy, "setting versioning");
        self.update_folder(folder_id, |folder| {
            policy.apply(&mut folder.versioning);
            Ok(())
        })
        .await
    }

    /// Apply a batch of setting changes in a single read-modify-write.
    pub async fn edit_folder(&self, folder_id: &str, edits: &[FolderEdit]) -> Result<Folder, Error> {
        debug!(folder_id, count = edits.len(), "editing folder");
        self.update_folder(folder_id, |folder| {
            for edit in edits {
                edit.apply(folder);
            }
            Ok(())
        })
        .await
    }
}
