//! The alpha configuration surface.
//!
//! A partial, opt-in view of [`Config`] used to adopt structured settings one
//! section at a time while the rest of the configuration still comes from
//! legacy flags. Fields here may change between releases without notice.

use super::{Config, Cookie, Header, PageTemplates, ProbeOptions, Provider, ProxyOptions, Server};
use super::{SessionOptions, UpstreamConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlphaConfig {
    pub proxy_options: ProxyOptions,
    pub probe_options: ProbeOptions,
    pub upstream_config: UpstreamConfig,
    pub inject_request_headers: Vec<Header>,
    pub inject_response_headers: Vec<Header>,
    pub server: Server,
    pub metrics_server: Server,
    pub providers: Vec<Provider>,
    pub cookie: Cookie,
    pub session: SessionOptions,
    pub page_templates: PageTemplates,
}

impl AlphaConfig {
    /// Copies the alpha-managed sections out of `config`.
    pub fn extract_from(config: &Config) -> Self {
        Self {
            proxy_options: config.proxy_options.clone(),
            probe_options: config.probe_options.clone(),
            upstream_config: config.upstream_config.clone(),
            inject_request_headers: config.inject_request_headers.clone(),
            inject_response_headers: config.inject_response_headers.clone(),
            server: config.server.clone(),
            metrics_server: config.metrics_server.clone(),
            providers: config.providers.clone(),
            cookie: config.cookie.clone(),
            session: config.session.clone(),
            page_templates: config.page_templates.clone(),
        }
    }

    /// Overwrites the alpha-managed sections of `config`. Logging and runtime
    /// state are left as they are.
    pub fn merge_into(self, config: &mut Config) {
        config.proxy_options = self.proxy_options;
        config.probe_options = self.probe_options;
        config.upstream_config = self.upstream_config;
        config.inject_request_headers = self.inject_request_headers;
        config.inject_response_headers = self.inject_response_headers;
        config.server = self.server;
        config.metrics_server = self.metrics_server;
        config.providers = self.providers;
        config.cookie = self.cookie;
        config.session = self.session;
        config.page_templates = self.page_templates;
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read alpha config file: {:?}", path))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse alpha config file: {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Duration, IdTokenVerifier, Upstream};
    use std::sync::Arc;
    use url::Url;

    #[derive(Debug)]
    struct StaticVerifier;

    impl IdTokenVerifier for StaticVerifier {
        fn issuer(&self) -> &str {
            "https://issuer.example.com"
        }

        fn verify(&self, _raw_id_token: &str) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::json!({ "sub": "user" }))
        }
    }

    fn sample_config() -> Config {
        let mut config = Config::default();
        config.proxy_options.proxy_prefix = "/auth".to_string();
        config.upstream_config.upstreams.push(Upstream {
            id: "/".to_string(),
            path: "/".to_string(),
            uri: "http://127.0.0.1:8080".to_string(),
            pass_host_header: Some(true),
            ..Upstream::default()
        });
        config.inject_request_headers.push(Header::from_claim("X-Forwarded-User", "user"));
        config.server.bind_address = "0.0.0.0:4180".to_string();
        config.providers[0].id = "google=abc".to_string();
        config.logging.silence_ping = true;
        config
    }

    #[test]
    fn test_merge_of_unedited_extraction_is_idempotent() {
        let mut config = sample_config();
        let before = AlphaConfig::extract_from(&config);

        AlphaConfig::extract_from(&config).merge_into(&mut config);

        assert_eq!(AlphaConfig::extract_from(&config), before);
        assert_eq!(config.logging, sample_config().logging);
    }

    #[test]
    fn test_merge_overwrites_alpha_fields() {
        let mut config = sample_config();
        let mut alpha = AlphaConfig::extract_from(&config);
        alpha.cookie.expire = Duration::from_hours(1);
        alpha.upstream_config.upstreams.clear();
        alpha.probe_options.ready_path = "/healthz".to_string();

        alpha.merge_into(&mut config);

        assert_eq!(config.cookie.expire, Duration::from_hours(1));
        assert!(config.upstream_config.upstreams.is_empty());
        assert_eq!(config.probe_options.ready_path, "/healthz");
    }

    #[test]
    fn test_merge_leaves_logging_and_runtime_state() {
        let mut config = sample_config();
        let url = Url::parse("https://app.example.com/oauth2/callback").unwrap();
        config.set_redirect_url(url.clone());
        config.set_oidc_verifier(Arc::new(StaticVerifier));

        let mut alpha = AlphaConfig::default();
        alpha.proxy_options.proxy_prefix = "/sso".to_string();
        alpha.merge_into(&mut config);

        assert_eq!(config.proxy_options.proxy_prefix, "/sso");
        assert!(config.providers.is_empty());
        assert!(config.logging.silence_ping);
        assert_eq!(config.redirect_url(), Some(&url));
        assert_eq!(
            config.oidc_verifier().map(|v| v.issuer()),
            Some("https://issuer.example.com")
        );
    }

    #[test]
    fn test_yaml_round_trip_preserves_view() {
        let alpha = AlphaConfig::extract_from(&sample_config());
        let yaml = alpha.to_yaml().unwrap();
        assert!(!yaml.contains("logging"));
        assert_eq!(AlphaConfig::from_yaml(&yaml).unwrap(), alpha);
    }

    #[test]
    fn test_from_yaml_reads_injected_headers() {
        let yaml = r#"
inject_request_headers:
  - name: X-Forwarded-Email
    values:
      - claim_source:
          claim: email
  - name: Authorization
    preserve_request_value: true
    values:
      - claim_source:
          claim: user
          basic_auth_password:
            value: czNjcmV0
inject_response_headers:
  - name: X-Api-Key
    values:
      - secret_source:
          from_env: API_KEY
providers:
  - id: google=abc
    type: google
    client_id: abc
"#;
        let alpha = AlphaConfig::from_yaml(yaml).unwrap();

        assert_eq!(
            alpha.inject_request_headers[0],
            Header::from_claim("X-Forwarded-Email", "email")
        );
        let basic = alpha.inject_request_headers[1].values[0]
            .claim_source
            .as_ref()
            .and_then(|claim| claim.basic_auth_password.as_ref())
            .map(|password| password.value.as_slice());
        assert_eq!(basic, Some(b"s3cret".as_slice()));
        assert_eq!(alpha.inject_request_headers[1].preserve_request_value, Some(true));
        assert_eq!(
            alpha.inject_response_headers[0].values[0]
                .secret_source
                .as_ref()
                .map(|secret| secret.from_env.as_str()),
            Some("API_KEY")
        );

        let mut config = sample_config();
        alpha.merge_into(&mut config);
        assert!(config.validate().is_ok());
        assert_eq!(config.inject_request_headers.len(), 2);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        assert!(AlphaConfig::from_yaml("upstreamConfig:\n  upstreams: []\n").is_err());
        assert!(AlphaConfig::from_yaml("cookie:\n  expiry: 1h\n").is_err());
        assert!(
            AlphaConfig::from_yaml(
                "inject_request_headers:\n  - name: X-User\n    preserveRequestValue: true\n"
            )
            .is_err()
        );
    }

    #[test]
    fn test_default_migration_dumps_loadable_yaml() {
        let config = crate::legacy::LegacyConfig::default().migrate().unwrap().config;
        let alpha = AlphaConfig::extract_from(&config);

        let yaml = alpha.to_yaml().unwrap();
        assert!(!yaml.contains('!'));
        assert_eq!(AlphaConfig::from_yaml(&yaml).unwrap(), alpha);
    }
}
