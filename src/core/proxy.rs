// src/core/proxy.rs

//! The HTTP/HTTPS reverse-proxy container. It watches the docker socket and
//! routes requests for `*.{domain}` to the right container, so it needs no
//! conflict handling beyond the default start flow.

use crate::constants::HTTP_PROXY_IMAGE;
use crate::core::service::DockerService;
use crate::models::{ContainerSpec, HttpProxySettings};

#[derive(Debug)]
pub struct HttpProxy {
    settings: HttpProxySettings,
}

impl HttpProxy {
    pub fn new(settings: HttpProxySettings) -> Self {
        Self { settings }
    }

    pub fn container_name(&self) -> &str {
        &self.settings.container_name
    }
}

impl DockerService for HttpProxy {
    fn service_name(&self) -> &'static str {
        "http_proxy"
    }

    fn container_spec(&self) -> ContainerSpec {
        let mut ports = vec!["80:80".to_string()];
        let mut volumes = vec!["/var/run/docker.sock:/tmp/docker.sock:ro".to_string()];
        if self.settings.https_enabled {
            ports.push("443:443".to_string());
            if !self.settings.ssl_certs_dir.is_empty() {
                volumes.push(format!("{}:/etc/nginx/certs", self.settings.ssl_certs_dir));
            }
        }
        ContainerSpec {
            name: self.settings.container_name.clone(),
            image: HTTP_PROXY_IMAGE.to_string(),
            ports,
            volumes,
            ..ContainerSpec::default()
        }
    }
}
