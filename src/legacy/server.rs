use crate::config::{SecretSource, Server, Tls};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyServer {
    pub http_address: String,
    pub https_address: String,
    pub tls_cert_file: String,
    pub tls_key_file: String,
    pub tls_min_version: String,
    pub tls_cipher_suites: Vec<String>,

    pub metrics_address: String,
    pub metrics_secure_address: String,
    pub metrics_tls_cert_file: String,
    pub metrics_tls_key_file: String,
}

impl Default for LegacyServer {
    fn default() -> Self {
        Self {
            http_address: "127.0.0.1:4180".to_string(),
            https_address: ":443".to_string(),
            tls_cert_file: String::new(),
            tls_key_file: String::new(),
            tls_min_version: String::new(),
            tls_cipher_suites: Vec::new(),
            metrics_address: String::new(),
            metrics_secure_address: String::new(),
            metrics_tls_cert_file: String::new(),
            metrics_tls_key_file: String::new(),
        }
    }
}

impl LegacyServer {
    /// Returns the (proxy, metrics) servers.
    pub fn convert(&self) -> (Server, Server) {
        let mut app = Server {
            bind_address: self.http_address.clone(),
            secure_bind_address: self.https_address.clone(),
            tls: None,
        };

        // Only one listener ever ran in the legacy layout: HTTPS when
        // certificates are present, plain HTTP otherwise.
        if !self.tls_cert_file.is_empty() || !self.tls_key_file.is_empty() {
            app.tls = Some(Tls {
                key: SecretSource::from_file(self.tls_key_file.as_str()),
                cert: SecretSource::from_file(self.tls_cert_file.as_str()),
                min_version: self.tls_min_version.clone(),
                cipher_suites: self.tls_cipher_suites.clone(),
            });
            app.bind_address.clear();
        } else {
            app.secure_bind_address.clear();
        }

        let mut metrics = Server {
            bind_address: self.metrics_address.clone(),
            secure_bind_address: self.metrics_secure_address.clone(),
            tls: None,
        };
        if !self.metrics_tls_cert_file.is_empty() || !self.metrics_tls_key_file.is_empty() {
            metrics.tls = Some(Tls {
                key: SecretSource::from_file(self.metrics_tls_key_file.as_str()),
                cert: SecretSource::from_file(self.metrics_tls_cert_file.as_str()),
                ..Tls::default()
            });
        }

        (app, metrics)
    }
}
