// src/core/config.rs

//! # Config Resolver
//!
//! Produces the effective settings tree: built-in defaults, optionally
//! overlaid with the operator's override file. The overlay is per-field:
//! an override file supplying a subset of fields for a service keeps the
//! defaults for everything it omits. The top-level `debug` flag is the one
//! exception; it is copied verbatim from the override document, never merged.
//!
//! Settings are recomputed on every call. Nothing here is cached, so editing
//! the override file takes effect on the next command without restarts.

use crate::core::paths;
use crate::models::{OverrideDocument, Settings, SettingsOverlay};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings file '{path}' is not valid TOML: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Settings file '{path}' is missing the top-level [dockhand] section.")]
    MissingSection { path: String },
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Location(#[from] paths::PathError),
}

/// The commented default settings document, written by `dockhand config init`.
/// Kept as text (rather than serialized from `Settings::default()`) so the
/// guidance comments survive into the operator's file.
pub fn default_document() -> String {
    let defaults = Settings::default();
    format!(
        r#"# dockhand settings.
# Be careful if you change the settings of some of these services. They may
# not talk to each other if you change addresses. For example, the host
# resolver expects a nameserver listening at the configured address; the DNS
# resolver container normally provides this, but if you disable it your
# system will be told to use a name server that doesn't exist.

[dockhand]
# debug = false

[dockhand.dns_resolver]
enabled = true
domain = "{domain}"           # domain that will be listened for
address = "{address}"         # address returned for queries against domain
container_name = "{dns_name}"

[dockhand.http_proxy]
enabled = true
container_name = "{proxy_name}"
https_enabled = true
ssl_certs_dir = ""            # leave empty to use default certs

[dockhand.host_resolver]
enabled = true
nameserver = "{nameserver}"
"#,
        domain = defaults.dns_resolver.domain,
        address = defaults.dns_resolver.address,
        dns_name = defaults.dns_resolver.container_name,
        proxy_name = defaults.http_proxy.container_name,
        nameserver = defaults.host_resolver.nameserver,
    )
}

/// Resolves the effective settings from the default override-file location.
pub fn resolve_default_location() -> Result<Settings, ConfigError> {
    let path = paths::settings_file_path()?;
    resolve_settings(Some(&path))
}

/// Resolves the effective settings tree.
///
/// - No path, or no file at the path: the built-in defaults, unmodified
///   (`debug` false).
/// - A file that is not valid TOML: `ConfigError::Parse`. A malformed
///   override never falls back silently to defaults.
/// - A valid document without the top-level `[dockhand]` table the merge
///   indexes into: `ConfigError::MissingSection`.
/// - Otherwise: per-field overlay of the document onto the defaults.
pub fn resolve_settings(override_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = override_path else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        log::debug!(
            "No settings file at '{}', using built-in defaults",
            path.display()
        );
        return Ok(Settings::default());
    }

    let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let document: OverrideDocument = toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    let overlay = document.dockhand.ok_or_else(|| ConfigError::MissingSection {
        path: path.display().to_string(),
    })?;

    Ok(merge(Settings::default(), &overlay))
}

/// Overlays the override document onto a copy of the defaults, field by field.
fn merge(mut settings: Settings, overlay: &SettingsOverlay) -> Settings {
    if let Some(dns) = &overlay.dns_resolver {
        let target = &mut settings.dns_resolver;
        overlay_field(&mut target.enabled, &dns.enabled);
        overlay_field(&mut target.domain, &dns.domain);
        overlay_field(&mut target.address, &dns.address);
        overlay_field(&mut target.container_name, &dns.container_name);
    }
    if let Some(proxy) = &overlay.http_proxy {
        let target = &mut settings.http_proxy;
        overlay_field(&mut target.enabled, &proxy.enabled);
        overlay_field(&mut target.container_name, &proxy.container_name);
        overlay_field(&mut target.https_enabled, &proxy.https_enabled);
        overlay_field(&mut target.ssl_certs_dir, &proxy.ssl_certs_dir);
    }
    if let Some(resolv) = &overlay.host_resolver {
        let target = &mut settings.host_resolver;
        overlay_field(&mut target.enabled, &resolv.enabled);
        overlay_field(&mut target.nameserver, &resolv.nameserver);
    }
    // Taken verbatim when an override file exists, not merged.
    settings.debug = overlay.debug.unwrap_or(false);
    settings
}

fn overlay_field<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

/// Writes the commented default document to `path`. Used by `config init`.
pub fn write_default_settings(path: &Path) -> Result<(), ConfigError> {
    fs::write(path, default_document()).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
