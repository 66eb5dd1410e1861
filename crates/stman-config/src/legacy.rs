//! Plain INI profile files.
//!
//! Older Syncthing manager tools wrote the same sections with unquoted
//! values (`apikey = abc123`), which strict TOML rejects. Keys set in
//! `[DEFAULT]` apply to every profile that does not set them itself.

use ini::{Ini, Properties};

use crate::{
    Config, ConfigError, DEFAULT_HOSTNAME, DEFAULT_PORT, DEFAULT_SECTION, DefaultSection, Profile,
};

/// Read `text` as an INI profile file.
///
/// `None` means the text is not INI, or has no `[DEFAULT]` section and no
/// section with an `apikey`; the caller keeps its own parse error then.
pub(crate) fn parse(text: &str) -> Option<Result<Config, ConfigError>> {
    let ini = match Ini::load_from_str(text) {
        Ok(ini) => ini,
        Err(e) => {
            tracing::debug!(error = %e, "profile file is not INI either");
            return None;
        }
    };

    let has_profiles = ini
        .iter()
        .any(|(section, props)| section == Some(DEFAULT_SECTION) || props.contains_key("apikey"));
    if !has_profiles {
        return None;
    }
    Some(to_config(&ini))
}

fn to_config(ini: &Ini) -> Result<Config, ConfigError> {
    let defaults = ini.section(Some(DEFAULT_SECTION));
    let mut config = Config {
        default: defaults
            .and_then(|d| d.get("name"))
            .map(|name| DefaultSection { name: name.to_owned() }),
        ..Config::default()
    };

    for (section, props) in ini.iter() {
        match section {
            None | Some(DEFAULT_SECTION) => {}
            Some(name) => {
                let lookup = Lookup { section: name, props, defaults };
                config.profiles.insert(name.to_owned(), lookup.profile()?);
            }
        }
    }
    Ok(config)
}

struct Lookup<'a> {
    section: &'a str,
    props: &'a Properties,
    defaults: Option<&'a Properties>,
}

impl Lookup<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.props
            .get(key)
            .or_else(|| self.defaults.and_then(|d| d.get(key)))
    }

    fn profile(&self) -> Result<Profile, ConfigError> {
        let apikey = self
            .get("apikey")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| self.invalid("apikey", "missing".into()))?;
        let port = match self.get("port") {
            Some(raw) => raw
                .parse()
                .map_err(|_| self.invalid("port", format!("'{raw}' is not a port number")))?,
            None => DEFAULT_PORT,
        };

        Ok(Profile {
            apikey: apikey.to_owned(),
            hostname: self.get("hostname").unwrap_or(DEFAULT_HOSTNAME).to_owned(),
            port,
            https: self.flag("https")?,
            insecure: self.flag("insecure")?,
        })
    }

    /// Booleans in the spellings INI readers accept.
    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get(key).map(str::to_ascii_lowercase).as_deref() {
            None | Some("0" | "no" | "false" | "off") => Ok(false),
            Some("1" | "yes" | "true" | "on") => Ok(true),
            Some(other) => Err(self.invalid(key, format!("'{other}' is not a boolean"))),
        }
    }

    fn invalid(&self, key: &str, reason: String) -> ConfigError {
        ConfigError::Validation {
            field: format!("[{}] {key}", self.section),
            reason,
        }
    }
}
