//! `configure` and `profiles` handlers. Neither talks to a daemon.

use secrecy::ExposeSecret;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigureArgs, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── configure ───────────────────────────────────────────────────────

/// Write (or overwrite) one profile, creating the file on first use.
///
/// Without `--apikey` the key is read from the local daemon's config.xml.
pub fn handle(args: ConfigureArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global)?;
    let mut cfg = config::load_config_or_default(&path)?;

    let apikey = match args.apikey {
        Some(key) => key,
        None => stman_config::discover_api_key(args.syncthing_config.as_deref())?
            .expose_secret()
            .to_owned(),
    };
    if apikey.trim().is_empty() {
        return Err(CliError::Validation {
            field: "apikey".into(),
            reason: "must not be empty".into(),
        });
    }

    let name = args.name.unwrap_or_else(|| args.hostname.clone());
    let profile = Profile {
        apikey,
        hostname: args.hostname,
        port: args.port,
        https: args.https,
        insecure: args.insecure,
    };
    // Reject hostnames that cannot form a URL before touching the file.
    profile.base_url()?;

    cfg.upsert(&name, profile, args.default)?;
    config::save_config(&path, &cfg)?;

    let suffix = if cfg.default_name() == Some(name.as_str()) {
        " (default)"
    } else {
        ""
    };
    output::print_done(
        &format!("Saved profile '{name}'{suffix} to {}", path.display()),
        global.quiet,
    );
    Ok(())
}

// ── profiles ────────────────────────────────────────────────────────

/// A profile as shown by `stman profiles`; the API key is never printed.
#[derive(Debug, Serialize)]
struct ProfileView {
    name: String,
    default: bool,
    url: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
}

fn profile_views(cfg: &Config) -> Vec<ProfileView> {
    cfg.profiles
        .iter()
        .map(|(name, p)| ProfileView {
            name: name.clone(),
            default: cfg.default_name() == Some(name.as_str()),
            url: p
                .base_url()
                .map_or_else(|_| format!("{}:{}", p.hostname, p.port), |u| u.to_string()),
        })
        .collect()
}

pub fn list_profiles(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config(&config::config_path(global)?)?;
    let views = profile_views(&cfg);

    let out = output::render_list(
        global.output,
        &views,
        |v| ProfileRow {
            marker: if v.default { "*" } else { "" },
            name: v.name.clone(),
            url: v.url.clone(),
        },
        |v| v.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn views_mark_default_and_hide_key() {
        let mut cfg = Config::default();
        cfg.upsert("laptop", Profile::new("secret", "localhost", 8384), false)
            .unwrap();
        cfg.upsert("nas", Profile::new("secret2", "nas.lan", 8385), false)
            .unwrap();

        let views = profile_views(&cfg);
        assert_eq!(views.len(), 2);
        assert!(views[0].default);
        assert!(!views[1].default);
        assert_eq!(views[1].url, "http://nas.lan:8385/");

        let json = serde_json::to_string(&views).unwrap();
        assert!(!json.contains("secret"));
    }
}
