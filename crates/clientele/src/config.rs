//! CLI configuration: thin wrapper around `clientele_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --sid, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use clientele_core::{ManagerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use clientele_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build a `ManagerConfig` from the config file, the active profile and
/// flag overrides. Without a profile, `--url` alone is enough.
pub fn resolve_manager_config(global: &GlobalOpts) -> Result<ManagerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg, global);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() && global.url.is_none() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_url(url_str)?;

    Ok(ManagerConfig {
        url,
        session_id: global.sid.clone().map(SecretString::from),
        tls: if global.insecure || cfg.defaults.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        },
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
    })
}

/// Translate a `Profile` + global flags into a `ManagerConfig`.
/// Flags take priority over profile values.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ManagerConfig, CliError> {
    let mut manager = clientele_config::profile_to_manager_config(profile, profile_name, &cfg.defaults)?;

    if let Some(ref url_str) = global.url {
        manager.url = parse_url(url_str)?;
    }
    if let Some(ref sid) = global.sid {
        manager.session_id = Some(SecretString::from(sid.clone()));
    }
    if global.insecure {
        manager.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        manager.timeout = Duration::from_secs(secs);
    }
    Ok(manager)
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}
