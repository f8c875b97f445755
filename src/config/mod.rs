pub mod alpha;
pub mod duration;
mod header;
mod provider;
mod runtime;
mod types;
mod upstream;

pub use alpha::AlphaConfig;
pub use duration::Duration;
pub use header::*;
pub use provider::*;
pub use runtime::{IdTokenVerifier, RealClientIpParser, SignatureData, SignatureHash};
pub use types::*;
pub use upstream::*;

use anyhow::{Context, Result};
use runtime::RuntimeState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// The structured configuration handed to the rest of the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub proxy_options: ProxyOptions,
    pub probe_options: ProbeOptions,
    pub cookie: Cookie,
    pub session: SessionOptions,
    pub logging: Logging,
    pub page_templates: PageTemplates,
    pub upstream_config: UpstreamConfig,
    pub inject_request_headers: Vec<Header>,
    pub inject_response_headers: Vec<Header>,
    pub server: Server,
    pub metrics_server: Server,
    /// Only the first entry is used by the proxy today.
    pub providers: Vec<Provider>,

    #[serde(skip)]
    runtime: RuntimeState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_options: ProxyOptions::default(),
            probe_options: ProbeOptions::default(),
            cookie: Cookie::default(),
            session: SessionOptions::default(),
            logging: Logging::default(),
            page_templates: PageTemplates::default(),
            upstream_config: UpstreamConfig::default(),
            inject_request_headers: Vec::new(),
            inject_response_headers: Vec::new(),
            server: Server::default(),
            metrics_server: Server::default(),
            providers: vec![Provider::default()],
            runtime: RuntimeState::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    pub fn redirect_url(&self) -> Option<&Url> {
        self.runtime.redirect_url.as_ref()
    }

    pub fn set_redirect_url(&mut self, url: Url) {
        self.runtime.redirect_url = Some(url);
    }

    pub fn signature_data(&self) -> Option<&SignatureData> {
        self.runtime.signature_data.as_ref()
    }

    pub fn set_signature_data(&mut self, data: SignatureData) {
        self.runtime.signature_data = Some(data);
    }

    pub fn oidc_verifier(&self) -> Option<&Arc<dyn IdTokenVerifier>> {
        self.runtime.oidc_verifier.as_ref()
    }

    pub fn set_oidc_verifier(&mut self, verifier: Arc<dyn IdTokenVerifier>) {
        self.runtime.oidc_verifier = Some(verifier);
    }

    pub fn jwt_bearer_verifiers(&self) -> &[Arc<dyn IdTokenVerifier>] {
        &self.runtime.jwt_bearer_verifiers
    }

    pub fn set_jwt_bearer_verifiers(&mut self, verifiers: Vec<Arc<dyn IdTokenVerifier>>) {
        self.runtime.jwt_bearer_verifiers = verifiers;
    }

    pub fn real_client_ip_parser(&self) -> Option<&Arc<dyn RealClientIpParser>> {
        self.runtime.real_client_ip_parser.as_ref()
    }

    pub fn set_real_client_ip_parser(&mut self, parser: Arc<dyn RealClientIpParser>) {
        self.runtime.real_client_ip_parser = Some(parser);
    }

    pub fn validate(&self) -> Result<()> {
        // Validate upstreams
        let mut upstream_ids = HashSet::new();
        for upstream in &self.upstream_config.upstreams {
            if upstream.id.is_empty() {
                anyhow::bail!("Upstream with path '{}' must have an id", upstream.path);
            }
            if !upstream_ids.insert(upstream.id.as_str()) {
                anyhow::bail!("Multiple upstreams found with id '{}'", upstream.id);
            }
            if upstream.is_static {
                if !upstream.uri.is_empty() {
                    anyhow::bail!("Static upstream '{}' must not set a uri", upstream.id);
                }
                if upstream.has_transport_settings() {
                    anyhow::bail!(
                        "Static upstream '{}' must not set proxying options",
                        upstream.id
                    );
                }
            } else if upstream.uri.is_empty() {
                anyhow::bail!("Upstream '{}' must set a uri", upstream.id);
            }
        }

        // Validate injected headers
        for header in self
            .inject_request_headers
            .iter()
            .chain(&self.inject_response_headers)
        {
            if header.name.is_empty() {
                anyhow::bail!("Injected header must have a name");
            }
            if header.values.iter().any(|value| value.source_count() != 1) {
                anyhow::bail!(
                    "Header '{}' has a value that does not set exactly one source",
                    header.name
                );
            }
        }

        // Validate providers
        if self.providers.is_empty() {
            anyhow::bail!("At least one provider must be defined");
        }
        let mut provider_ids = HashSet::new();
        for provider in &self.providers {
            if provider.id.is_empty() {
                anyhow::bail!("Provider of type '{}' must have an id", provider.provider_type());
            }
            if !provider_ids.insert(provider.id.as_str()) {
                anyhow::bail!("Multiple providers found with id '{}'", provider.id);
            }
        }

        Ok(())
    }
}
