// Device configuration endpoints
//
// CRUD on `/rest/config/devices`. Edits are read-modify-write: the daemon
// has no partial-update verb we rely on, so the full object is fetched,
// changed locally and PUT back.

use tracing::debug;

use crate::client::SyncthingClient;
use crate::error::Error;
use crate::models::{Device, DeviceEdit, NewDevice};

impl SyncthingClient {
    /// List all configured devices, including the local one.
    ///
    /// `GET /rest/config/devices`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        let url = self.rest_url(&["config", "devices"])?;
        self.get(url).await
    }

    /// Fetch one device by ID.
    ///
    /// `GET /rest/config/devices/{id}`
    pub async fn get_device(&self, device_id: &str) -> Result<Device, Error> {
        let url = self.rest_url(&["config", "devices", device_id])?;
        self.get(url).await
    }

    /// Add a device, returning its normalized ID.
    ///
    /// The ID is checked with the daemon first; an already configured
    /// device yields [`Error::Conflict`] and nothing is written.
    ///
    /// `POST /rest/config/devices`
    pub async fn add_device(&self, mut device: NewDevice) -> Result<String, Error> {
        device.device_id = self.validate_device_id(&device.device_id).await?;

        match self.get_device(&device.device_id).await {
            Ok(_) => {
                return Err(Error::Conflict {
                    kind: "Device",
                    id: device.device_id,
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        debug!(device_id = %device.device_id, "adding device");
        let url = self.rest_url(&["config", "devices"])?;
        self.post(url, &device).await?;
        Ok(device.device_id)
    }

    /// Remove a device from the configuration.
    ///
    /// `DELETE /rest/config/devices/{id}`
    pub async fn remove_device(&self, device_id: &str) -> Result<(), Error> {
        debug!(device_id, "removing device");
        let url = self.rest_url(&["config", "devices", device_id])?;
        self.delete(url).await
    }

    /// Replace a device's configuration.
    ///
    /// `PUT /rest/config/devices/{id}`
    pub async fn put_device(&self, device: &Device) -> Result<(), Error> {
        let url = self.rest_url(&["config", "devices", device.device_id.as_str()])?;
        self.put(url, device).await
    }

    /// Fetch a device, apply `mutate`, and write the full object back.
    pub async fn update_device<F>(&self, device_id: &str, mutate: F) -> Result<Device, Error>
    where
        F: FnOnce(&mut Device) -> Result<(), Error>,
    {
        let mut device = self.get_device(device_id).await?;
        mutate(&mut device)?;
        self.put_device(&device).await?;
        Ok(device)
    }

    /// Apply a batch of edits in a single read-modify-write.
    pub async fn edit_device(&self, device_id: &str, edits: &[DeviceEdit]) -> Result<Device, Error> {
        debug!(device_id, count = edits.len(), "editing device");
        self.update_device(device_id, |device| {
            for edit in edits {
                edit.apply(device);
            }
            Ok(())
        })
        .await
    }
}
