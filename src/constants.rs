// src/constants.rs

/// The name of the operator override file, looked up in the home directory.
pub const SETTINGS_FILENAME: &str = ".dockhand.toml";

/// The image used for the DNS resolver container. It wraps dnsmasq and takes
/// the domain and the answer address as positional arguments.
pub const DNSMASQ_IMAGE: &str = "dockhand/dnsmasq";

/// The image used for the HTTP/HTTPS reverse-proxy container.
pub const HTTP_PROXY_IMAGE: &str = "codekitchen/dinghy-http-proxy";

/// The privileged port the DNS resolver container must own on the host.
pub const DNS_PORT: u16 = 53;

/// Marker appended to resolver entries we write, so `down` removes only ours.
pub const RESOLV_MARKER: &str = "# added by dockhand";
