// System, service and database endpoints
//
// Read-only status used by the listings, device ID validation, and the
// pause/resume controls.

use tracing::debug;

use crate::client::SyncthingClient;
use crate::error::Error;
use crate::models::{Connections, DeviceIdResponse, FolderStatus, SystemStatus};

impl SyncthingClient {
    /// `GET /rest/system/status`
    pub async fn system_status(&self) -> Result<SystemStatus, Error> {
        let url = self.rest_url(&["system", "status"])?;
        self.get(url).await
    }

    /// `GET /rest/system/connections`
    pub async fn connections(&self) -> Result<Connections, Error> {
        let url = self.rest_url(&["system", "connections"])?;
        self.get(url).await
    }

    /// Completion state of one folder.
    ///
    /// `GET /rest/db/status?folder={id}`
    pub async fn folder_status(&self, folder_id: &str) -> Result<FolderStatus, Error> {
        let mut url = self.rest_url(&["db", "status"])?;
        url.query_pairs_mut().append_pair("folder", folder_id);
        self.get(url).await
    }

    /// Check a device ID and return it in canonical form.
    ///
    /// `GET /rest/svc/deviceid?id={id}`
    pub async fn validate_device_id(&self, device_id: &str) -> Result<String, Error> {
        let mut url = self.rest_url(&["svc", "deviceid"])?;
        url.query_pairs_mut().append_pair("id", device_id);
        let resp: DeviceIdResponse = self.get(url).await?;
        match (resp.id, resp.error) {
            (Some(id), None) => Ok(id),
            (_, Some(reason)) => Err(Error::InvalidDeviceId {
                id: device_id.to_owned(),
                reason,
            }),
            (None, None) => Err(Error::Protocol {
                message: "device ID response had neither id nor error".into(),
                body: String::new(),
            }),
        }
    }

    /// Pause one device, or every device when `device_id` is `None`.
    ///
    /// `POST /rest/system/pause[?device={id}]`
    pub async fn pause(&self, device_id: Option<&str>) -> Result<(), Error> {
        debug!(?device_id, "pausing");
        let url = self.device_scoped_url("pause", device_id)?;
        self.post_empty(url).await
    }

    /// Resume one device, or every device when `device_id` is `None`.
    ///
    /// `POST /rest/system/resume[?device={id}]`
    pub async fn resume(&self, device_id: Option<&str>) -> Result<(), Error> {
        debug!(?device_id, "resuming");
        let url = self.device_scoped_url("resume", device_id)?;
        self.post_empty(url).await
    }

    fn device_scoped_url(&self, action: &str, device_id: Option<&str>) -> Result<url::Url, Error> {
        let mut url = self.rest_url(&["system", action])?;
        if let Some(id) = device_id {
            url.query_pairs_mut().append_pair("device", id);
        }
        Ok(url)
    }
}
