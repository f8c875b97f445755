use super::Duration;
use serde::{Deserialize, Serialize};

/// Default period between flushes of a streamed upstream response.
pub const DEFAULT_UPSTREAM_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Default maximum wait for an upstream response.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Requests are routed to the first upstream whose path matches.
    #[serde(default)]
    pub upstreams: Vec<Upstream>,
}

/// A single routable backend: networked (http, https, unix), file-backed,
/// or a static response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Upstream {
    /// Must be unique across the upstream list.
    pub id: String,

    pub path: String,

    /// Empty for static upstreams.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_skip_tls_verify: Option<bool>,

    /// Serve a fixed response instead of proxying.
    #[serde(default, rename = "static")]
    pub is_static: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush_interval: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_host_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_websockets: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Upstream {
    /// True when any proxying knob is set. Static upstreams must have none.
    pub fn has_transport_settings(&self) -> bool {
        self.insecure_skip_tls_verify.is_some()
            || self.flush_interval.is_some()
            || self.pass_host_header.is_some()
            || self.proxy_websockets.is_some()
            || self.timeout.is_some()
    }

    /// Drops every proxying knob and the target URI, leaving a static responder.
    pub fn make_static(&mut self, code: u16) {
        self.is_static = true;
        self.static_code = Some(code);
        self.uri.clear();
        self.insecure_skip_tls_verify = None;
        self.flush_interval = None;
        self.pass_host_header = None;
        self.proxy_websockets = None;
        self.timeout = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_static_clears_transport() {
        let mut upstream = Upstream {
            id: "/".to_string(),
            path: "/".to_string(),
            uri: "http://localhost:8080".to_string(),
            insecure_skip_tls_verify: Some(true),
            flush_interval: Some(DEFAULT_UPSTREAM_FLUSH_INTERVAL),
            pass_host_header: Some(true),
            proxy_websockets: Some(true),
            timeout: Some(DEFAULT_UPSTREAM_TIMEOUT),
            ..Upstream::default()
        };
        assert!(upstream.has_transport_settings());

        upstream.make_static(204);

        assert!(upstream.is_static);
        assert_eq!(upstream.static_code, Some(204));
        assert!(upstream.uri.is_empty());
        assert!(!upstream.has_transport_settings());
    }

    #[test]
    fn test_upstream_yaml_uses_static_key() {
        let yaml = r#"
id: static-root
path: /
static: true
static_code: 404
"#;
        let upstream: Upstream = serde_yml::from_str(yaml).unwrap();
        assert!(upstream.is_static);
        assert_eq!(upstream.static_code, Some(404));
        assert!(upstream.uri.is_empty());
    }
}
