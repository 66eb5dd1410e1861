//! Profile configuration for the stman CLI.
//!
//! A profile names one Syncthing daemon: its API key, host and port. The
//! profile file is TOML laid out INI-style, one table per profile plus a
//! `[DEFAULT]` table whose `name` key selects the profile used when none
//! is given on the command line. Plain INI files with unquoted values are
//! read too; saving always writes TOML.

mod discover;
mod legacy;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use discover::{discover_api_key, syncthing_config_candidates};

/// Section name reserved for the default-profile pointer.
pub const DEFAULT_SECTION: &str = "DEFAULT";

pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8384;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("profile '{name}' is not configured (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("could not determine the user configuration directory; pass --config")]
    NoConfigDir,

    #[error("no default profile is set")]
    NoDefault,

    #[error("could not read the API key from Syncthing's config.xml (searched: {searched})")]
    ApiKeyDiscovery { searched: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Parse(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// The whole profile file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default-profile pointer.
    #[serde(rename = "DEFAULT", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSection>,

    /// Named profiles, one table each.
    #[serde(flatten)]
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefaultSection {
    pub name: String,
}

/// A named Syncthing daemon.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub apikey: String,

    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Talk HTTPS to the daemon GUI.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub https: bool,

    /// Accept self-signed certificates (the daemon's default GUI cert).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
}

fn default_hostname() -> String {
    DEFAULT_HOSTNAME.into()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("apikey", &"[REDACTED]")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("https", &self.https)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl Profile {
    pub fn new(apikey: impl Into<String>, hostname: impl Into<String>, port: u16) -> Self {
        Self {
            apikey: apikey.into(),
            hostname: hostname.into(),
            port,
            https: false,
            insecure: false,
        }
    }

    /// `http(s)://{hostname}:{port}/`. Bare IPv6 literals get bracketed.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let scheme = if self.https { "https" } else { "http" };
        let host = if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("[{}]", self.hostname)
        } else {
            self.hostname.clone()
        };
        Url::parse(&format!("{scheme}://{host}:{}/", self.port)).map_err(|e| {
            ConfigError::Validation {
                field: "hostname".into(),
                reason: format!("'{}': {e}", self.hostname),
            }
        })
    }

    pub fn api_key(&self) -> SecretString {
        SecretString::from(self.apikey.clone())
    }
}

/// The profile chosen for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub profile: Profile,
}

impl Config {
    /// Name of the default profile, if one is set.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_ref().map(|d| d.name.as_str())
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Select a profile by name, or the default when `name` is `None` or
    /// the literal `DEFAULT`.
    pub fn resolve(&self, name: Option<&str>) -> Result<ResolvedProfile, ConfigError> {
        let name = match name {
            Some(n) if n != DEFAULT_SECTION => n,
            _ => self.default_name().ok_or(ConfigError::NoDefault)?,
        };

        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.available_names(),
            })?;

        Ok(ResolvedProfile {
            name: name.into(),
            profile: profile.clone(),
        })
    }

    /// Insert or replace a profile. The first profile written, or any
    /// profile written with `make_default`, becomes the default.
    pub fn upsert(
        &mut self,
        name: &str,
        profile: Profile,
        make_default: bool,
    ) -> Result<(), ConfigError> {
        if name.is_empty() || name.eq_ignore_ascii_case(DEFAULT_SECTION) {
            return Err(ConfigError::Validation {
                field: "profile name".into(),
                reason: format!("'{name}' is reserved"),
            });
        }

        self.profiles.insert(name.into(), profile);
        if make_default || self.default.is_none() {
            self.default = Some(DefaultSection { name: name.into() });
        }
        Ok(())
    }

    fn available_names(&self) -> String {
        if self.profiles.is_empty() {
            return "none".into();
        }
        self.profile_names().collect::<Vec<_>>().join(", ")
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Per-user profile file, `<config dir>/stman/stman.conf`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "stman")
        .map(|dirs| dirs.config_dir().join("stman.conf"))
        .ok_or(ConfigError::NoConfigDir)
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the profile file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let config: Config = match Figment::new().merge(Toml::file_exact(path)).extract() {
        Ok(config) => config,
        Err(toml_err) => {
            let text = std::fs::read_to_string(path)?;
            match legacy::parse(&text) {
                Some(config) => {
                    tracing::debug!(path = %path.display(), "read profile file as plain INI");
                    config?
                }
                None => return Err(toml_err.into()),
            }
        }
    };

    if let Some(default) = config.default_name() {
        if !config.profiles.contains_key(default) {
            tracing::warn!(default, "default profile points at a missing section");
        }
    }
    Ok(config)
}

/// Load the profile file, or an empty config if it does not exist yet.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::NotFound { .. }) => Ok(Config::default()),
        other => other,
    }
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize `cfg` to TOML and write it to `path`, creating parent dirs.
pub fn save_config(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
[DEFAULT]
name = "laptop"

[laptop]
apikey = "abc123"
hostname = "localhost"
port = 8384

[nas]
apikey = "def456"
hostname = "192.168.1.20"
port = 8385
https = true
insecure = true
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("stman.conf");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loads_profiles_and_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.default_name(), Some("laptop"));
        assert_eq!(cfg.profile_names().collect::<Vec<_>>(), vec!["laptop", "nas"]);
        assert!(cfg.profiles["nas"].https);
        assert_eq!(cfg.profiles["nas"].port, 8385);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stman.conf");
        std::fs::write(&path, "[laptop\napikey = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_plain_ini_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stman.conf");
        std::fs::write(
            &path,
            "[DEFAULT]\nname = laptop\n\n[laptop]\napikey = abc123\nhostname = localhost\nport = 8384\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        let resolved = cfg.resolve(None).unwrap();
        assert_eq!(resolved.name, "laptop");
        assert_eq!(resolved.profile, Profile::new("abc123", "localhost", 8384));
    }

    #[test]
    fn resolve_uses_default_section() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.resolve(None).unwrap().name, "laptop");
        assert_eq!(cfg.resolve(Some("DEFAULT")).unwrap().name, "laptop");
        assert_eq!(cfg.resolve(Some("nas")).unwrap().profile.apikey, "def456");
    }

    #[test]
    fn resolve_unknown_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&write_sample(&dir)).unwrap();

        match cfg.resolve(Some("desktop")).unwrap_err() {
            ConfigError::ProfileNotFound { name, available } => {
                assert_eq!(name, "desktop");
                assert_eq!(available, "laptop, nas");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn resolve_without_default_fails() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("a".into(), Profile::new("k", DEFAULT_HOSTNAME, DEFAULT_PORT));
        assert!(matches!(cfg.resolve(None), Err(ConfigError::NoDefault)));
    }

    #[test]
    fn first_upsert_becomes_default() {
        let mut cfg = Config::default();
        cfg.upsert("one", Profile::new("k1", "localhost", 8384), false)
            .unwrap();
        cfg.upsert("two", Profile::new("k2", "localhost", 8385), false)
            .unwrap();
        assert_eq!(cfg.default_name(), Some("one"));

        cfg.upsert("two", Profile::new("k3", "localhost", 8385), true)
            .unwrap();
        assert_eq!(cfg.default_name(), Some("two"));
        assert_eq!(cfg.profiles["two"].apikey, "k3");
    }

    #[test]
    fn default_is_a_reserved_name() {
        let mut cfg = Config::default();
        let err = cfg
            .upsert("DEFAULT", Profile::new("k", "localhost", 8384), false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stman.conf");

        let mut cfg = Config::default();
        let mut nas = Profile::new("secret", "nas.local", 8384);
        nas.https = true;
        cfg.upsert("nas", nas, false).unwrap();
        save_config(&path, &cfg).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[DEFAULT]"));
        assert!(!text.contains("insecure"));

        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn base_url_handles_scheme_and_ipv6() {
        let mut p = Profile::new("k", "localhost", 8384);
        assert_eq!(p.base_url().unwrap().as_str(), "http://localhost:8384/");

        p.https = true;
        p.hostname = "::1".into();
        assert_eq!(p.base_url().unwrap().as_str(), "https://[::1]:8384/");
    }

    #[test]
    fn config_path_is_under_user_config_dir() {
        let path = config_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("stman.conf"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let p = Profile::new("hunter2", "localhost", 8384);
        assert!(!format!("{p:?}").contains("hunter2"));
    }
}
