// API key discovery from the local daemon's config.xml
//
// Only used by `configure` when no key is given. A missing file, an
// unreadable file and a file without `<gui><apikey>` all count as a miss;
// the next candidate is tried.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use secrecy::SecretString;
use tracing::debug;

use crate::ConfigError;

/// Default locations of the daemon's `config.xml` on this platform, most
/// recent layout first.
pub fn syncthing_config_candidates() -> Vec<PathBuf> {
    let Some(base) = BaseDirs::new() else {
        return Vec::new();
    };

    let mut dirs = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.push(base.config_dir().join("Syncthing"));
    } else if cfg!(windows) {
        dirs.push(base.data_local_dir().join("Syncthing"));
    } else {
        if let Some(state) = base.state_dir() {
            dirs.push(state.join("syncthing"));
        }
        dirs.push(base.config_dir().join("syncthing"));
    }

    dirs.into_iter().map(|d| d.join("config.xml")).collect()
}

/// Read the GUI API key from `explicit`, or from the first default
/// location that has one.
pub fn discover_api_key(explicit: Option<&Path>) -> Result<SecretString, ConfigError> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => syncthing_config_candidates(),
    };

    for path in &candidates {
        if let Some(key) = read_api_key(path) {
            debug!(path = %path.display(), "found API key in Syncthing config");
            return Ok(SecretString::from(key));
        }
    }

    let searched = if candidates.is_empty() {
        "no candidate locations".to_owned()
    } else {
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(ConfigError::ApiKeyDiscovery { searched })
}

fn read_api_key(path: &Path) -> Option<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot read Syncthing config");
            return None;
        }
    };
    api_key_from_xml(&text).or_else(|| {
        debug!(path = %path.display(), "no <gui><apikey> in Syncthing config");
        None
    })
}

fn api_key_from_xml(text: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(text).ok()?;
    let key = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("gui"))?
        .children()
        .find(|n| n.has_tag_name("apikey"))?
        .text()?
        .trim();
    (!key.is_empty()).then(|| key.to_owned())
}
