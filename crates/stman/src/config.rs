//! CLI configuration: thin wrapper around `stman_config`.
//!
//! Adds `GlobalOpts`-aware resolution (--config, --device, --timeout) and
//! turns the resolved profile into an API client.

use std::path::PathBuf;
use std::time::Duration;

use stman_api::{SyncthingClient, TlsMode, TransportConfig};
use stman_config::ResolvedProfile;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use stman_config::{Config, Profile, load_config, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Profile file path: `--config` / `STMAN_CONFIG`, else the per-user default.
pub fn config_path(global: &GlobalOpts) -> Result<PathBuf, CliError> {
    match &global.config {
        Some(path) => Ok(path.clone()),
        None => Ok(stman_config::config_path()?),
    }
}

/// Load the profile file and pick the active profile.
///
/// Fails before any network traffic when the file or profile is missing.
pub fn resolve_profile(global: &GlobalOpts) -> Result<ResolvedProfile, CliError> {
    let path = config_path(global)?;
    let cfg = load_config(&path)?;
    let resolved = cfg.resolve(global.profile.as_deref())?;
    tracing::debug!(profile = %resolved.name, path = %path.display(), "resolved profile");
    Ok(resolved)
}

/// Translate a resolved profile + global flags into a `TransportConfig`.
pub fn transport_config(profile: &Profile, global: &GlobalOpts) -> TransportConfig {
    TransportConfig {
        tls: if profile.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: global.timeout.map(Duration::from_secs),
    }
}

/// Build an authenticated client for the resolved profile.
pub fn build_client(
    resolved: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<SyncthingClient, CliError> {
    let profile = &resolved.profile;
    let url = profile.base_url()?;
    let client = SyncthingClient::new(
        url,
        &profile.api_key(),
        &transport_config(profile, global),
    )?;
    Ok(client)
}
