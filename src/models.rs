// src/models.rs

use serde::{Deserialize, Serialize};

// --- EFFECTIVE SETTINGS TREE ---
// The fully merged configuration every component reads from. It is recomputed
// on every resolve and never mutated once produced.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    pub dns_resolver: DnsResolverSettings,
    pub http_proxy: HttpProxySettings,
    pub host_resolver: HostResolverSettings,
    pub debug: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DnsResolverSettings {
    pub enabled: bool,
    /// Domain that the resolver answers for (e.g. `docker`).
    pub domain: String,
    /// Address returned for queries against the domain.
    pub address: String,
    pub container_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HttpProxySettings {
    pub enabled: bool,
    pub container_name: String,
    pub https_enabled: bool,
    /// Leave empty to use the image's bundled certificates.
    pub ssl_certs_dir: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HostResolverSettings {
    pub enabled: bool,
    pub nameserver: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dns_resolver: DnsResolverSettings {
                enabled: true,
                domain: "docker".to_string(),
                address: "127.0.0.1".to_string(),
                container_name: "dockhand_dnsmasq".to_string(),
            },
            http_proxy: HttpProxySettings {
                enabled: true,
                container_name: "dockhand_http_proxy".to_string(),
                https_enabled: true,
                ssl_certs_dir: String::new(),
            },
            host_resolver: HostResolverSettings {
                enabled: true,
                nameserver: "127.0.0.1".to_string(),
            },
            debug: false,
        }
    }
}

// --- OVERRIDE FILE DOCUMENT ---
// The deserialized shape of `~/.dockhand.toml`. Every field is optional: the
// merge step overlays present fields onto a copy of the defaults, field by
// field, so an unset override field never erases a default.

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OverrideDocument {
    pub dockhand: Option<SettingsOverlay>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SettingsOverlay {
    pub dns_resolver: Option<DnsResolverOverlay>,
    pub http_proxy: Option<HttpProxyOverlay>,
    pub host_resolver: Option<HostResolverOverlay>,
    pub debug: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DnsResolverOverlay {
    pub enabled: Option<bool>,
    pub domain: Option<String>,
    pub address: Option<String>,
    pub container_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct HttpProxyOverlay {
    pub enabled: Option<bool>,
    pub container_name: Option<String>,
    pub https_enabled: Option<bool>,
    pub ssl_certs_dir: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct HostResolverOverlay {
    pub enabled: Option<bool>,
    pub nameserver: Option<String>,
}

// --- RUNTIME MODELS ---

/// One process bound to an inspected port, mapped positionally from an
/// `lsof -i` row. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerRecord {
    pub command: String,
    pub pid: u32,
    pub user: String,
    pub fd: String,
    pub kind: String,
    pub device: String,
    pub size: String,
    pub node: String,
    pub name: String,
}

/// A typed description of a `docker run` invocation. Rendering this into a
/// command line is the single shell-escaping boundary in the codebase.
#[derive(Debug, Clone, Default)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// Publish list in `docker -p` syntax (e.g. `53:53/udp`).
    pub ports: Vec<String>,
    /// Capability grants in `docker --cap-add` syntax (e.g. `NET_ADMIN`).
    pub cap_adds: Vec<String>,
    /// Volume mounts in `docker -v` syntax.
    pub volumes: Vec<String>,
    /// Environment entries in `KEY=VALUE` syntax.
    pub env: Vec<String>,
    /// Positional arguments handed to the image's entrypoint.
    pub args: Vec<String>,
}

/// Captured result of one external command. A non-zero exit is data here,
/// not an error: callers branch on `success` the way they would on `$?`.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Terminal result of a service startup sequence.
#[derive(Debug, Clone)]
pub enum StartOutcome {
    Started,
    /// The last captured command output, kept for operator diagnosis.
    Failed { last_output: Option<CommandOutput> },
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Observed state of a named container, per `docker ps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Exited,
    Absent,
}
