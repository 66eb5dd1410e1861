// Syncthing REST API HTTP client
//
// Wraps `reqwest::Client` with URL construction under `/rest/`, status
// checking, and typed body decoding. Endpoint groups (config, system, db)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Header the daemon reads the API key from.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for one Syncthing daemon.
///
/// Every request carries the profile's API key. Methods return decoded
/// models; non-2xx statuses become [`Error::Api`] and undecodable bodies
/// become [`Error::Protocol`].
#[derive(Debug, Clone)]
pub struct SyncthingClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SyncthingClient {
    /// Create a client for the daemon at `base_url` (e.g. `http://localhost:8384`).
    pub fn new(
        base_url: Url,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|_| Error::InvalidApiKey)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client from a base URL string and a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for authentication headers.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::with_client(http, Url::parse(base_url)?))
    }

    fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The daemon base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/rest/{segments...}`, percent-encoding each segment.
    ///
    /// Folder IDs are user-chosen and may contain spaces or slashes, so
    /// they must go through `path_segments_mut` rather than string joins.
    pub(crate) fn rest_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("rest")
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body, ignoring the response body.
    pub(crate) async fn post(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);
        self.send(self.http.post(url).json(body)).await?;
        Ok(())
    }

    /// Send a POST request without a body.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<(), Error> {
        debug!("POST {}", url);
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    /// Send a PUT request with a JSON body, ignoring the response body.
    pub(crate) async fn put(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("PUT {}", url);
        self.send(self.http.put(url).json(body)).await?;
        Ok(())
    }

    /// Send a DELETE request.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    /// Execute a request and turn non-2xx statuses into [`Error::Api`].
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = req.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                Error::Connection {
                    url: self.base_url.to_string(),
                    source: e,
                }
            } else {
                Error::Transport(e)
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(%status, error = %e, "failed to read error response body");
                String::new()
            }
        };
        let message = match body.trim() {
            "" => status
                .canonical_reason()
                .unwrap_or("request rejected")
                .to_owned(),
            text => text.to_owned(),
        };
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Decode a JSON body, keeping the raw text on failure.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(body = %body, "response body");
        serde_json::from_str(&body).map_err(|e| Error::Protocol {
            message: e.to_string(),
            body,
        })
    }
}
