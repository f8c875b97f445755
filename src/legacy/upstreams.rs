use super::deprecation::{Diagnostics, MigrationWarning};
use super::uri::UpstreamUri;
use crate::config::{
    DEFAULT_UPSTREAM_FLUSH_INTERVAL, DEFAULT_UPSTREAM_TIMEOUT, Duration, Upstream, UpstreamConfig,
};
use crate::error::{MigrationError, MigrationResult};
use serde::{Deserialize, Serialize};

const DEFAULT_STATIC_CODE: u16 = 200;

/// Upstream flags. The transport settings apply to every listed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyUpstreams {
    pub flush_interval: Duration,
    pub pass_host_header: bool,
    pub proxy_websockets: bool,
    pub ssl_upstream_insecure_skip_verify: bool,
    /// http(s):// and unix:// targets, file:// paths, or static://<code>.
    pub upstreams: Vec<String>,
    #[serde(rename = "upstream_timeout")]
    pub timeout: Duration,
}

impl Default for LegacyUpstreams {
    fn default() -> Self {
        Self {
            flush_interval: DEFAULT_UPSTREAM_FLUSH_INTERVAL,
            pass_host_header: true,
            proxy_websockets: true,
            ssl_upstream_insecure_skip_verify: false,
            upstreams: Vec::new(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

impl LegacyUpstreams {
    pub fn convert(&self, diagnostics: &mut Diagnostics) -> MigrationResult<UpstreamConfig> {
        let upstreams = self
            .upstreams
            .iter()
            .map(|raw| self.classify(raw, diagnostics))
            .collect::<MigrationResult<Vec<_>>>()?;

        Ok(UpstreamConfig { upstreams })
    }

    /// Turns one upstream string into a routable upstream.
    pub fn classify(&self, raw: &str, diagnostics: &mut Diagnostics) -> MigrationResult<Upstream> {
        let uri = UpstreamUri::parse(raw).map_err(|source| MigrationError::Upstreams {
            upstream: raw.to_string(),
            source,
        })?;

        let path = if uri.path.is_empty() {
            "/".to_string()
        } else {
            uri.path
        };

        let mut upstream = Upstream {
            id: path.clone(),
            path,
            uri: raw.to_string(),
            insecure_skip_tls_verify: Some(self.ssl_upstream_insecure_skip_verify),
            is_static: false,
            static_code: None,
            flush_interval: Some(self.flush_interval),
            pass_host_header: Some(self.pass_host_header),
            proxy_websockets: Some(self.proxy_websockets),
            timeout: Some(self.timeout),
        };

        match uri.scheme.as_str() {
            "file" => {
                // A fragment names the route, so one directory can be served
                // under several paths.
                if !uri.fragment.is_empty() {
                    upstream.id = uri.fragment.clone();
                    upstream.path = uri.fragment;
                    upstream.uri = raw.split('#').next().unwrap_or(raw).to_string();
                }
            }
            "static" => {
                let code = uri.host.parse::<u16>().unwrap_or_else(|_| {
                    diagnostics.warn(MigrationWarning::InvalidStaticCode {
                        upstream: raw.to_string(),
                        host: uri.host.clone(),
                    });
                    DEFAULT_STATIC_CODE
                });

                // Static entries are otherwise indistinguishable, so the full
                // string is the id. Only the root path is supported.
                upstream.id = raw.to_string();
                upstream.path = "/".to_string();
                upstream.make_static(code);
            }
            "unix" => {
                upstream.path = "/".to_string();
            }
            _ => {}
        }

        Ok(upstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(raw: &str) -> (Upstream, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let upstream = LegacyUpstreams::default()
            .classify(raw, &mut diagnostics)
            .unwrap();
        (upstream, diagnostics)
    }

    #[test]
    fn test_http_upstream_uses_defaults() {
        let (upstream, diagnostics) = classify("http://127.0.0.1:8080/api");

        assert_eq!(upstream.id, "/api");
        assert_eq!(upstream.path, "/api");
        assert_eq!(upstream.uri, "http://127.0.0.1:8080/api");
        assert_eq!(upstream.insecure_skip_tls_verify, Some(false));
        assert_eq!(upstream.pass_host_header, Some(true));
        assert_eq!(upstream.proxy_websockets, Some(true));
        assert_eq!(upstream.flush_interval, Some(Duration::from_secs(1)));
        assert_eq!(upstream.timeout, Some(Duration::from_secs(30)));
        assert!(!upstream.is_static);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_transport_flags_are_shared() {
        let legacy = LegacyUpstreams {
            pass_host_header: false,
            ssl_upstream_insecure_skip_verify: true,
            flush_interval: Duration::from_millis(500),
            upstreams: vec![
                "http://a.internal/".to_string(),
                "https://b.internal/b".to_string(),
            ],
            ..LegacyUpstreams::default()
        };

        let config = legacy.convert(&mut Diagnostics::new()).unwrap();
        assert_eq!(config.upstreams.len(), 2);
        for upstream in &config.upstreams {
            assert_eq!(upstream.pass_host_header, Some(false));
            assert_eq!(upstream.insecure_skip_tls_verify, Some(true));
            assert_eq!(upstream.flush_interval, Some(Duration::from_millis(500)));
        }
    }

    #[test]
    fn test_file_fragment_names_route() {
        let (upstream, _) = classify("file:///var/www#custom-id");

        assert_eq!(upstream.id, "custom-id");
        assert_eq!(upstream.path, "custom-id");
        assert_eq!(upstream.uri, "file:///var/www");
    }

    #[test]
    fn test_file_without_fragment_routes_by_path() {
        let (upstream, _) = classify("file:///var/www/");

        assert_eq!(upstream.id, "/var/www/");
        assert_eq!(upstream.path, "/var/www/");
        assert_eq!(upstream.uri, "file:///var/www/");
    }

    #[test]
    fn test_static_code() {
        let (upstream, diagnostics) = classify("static://404");

        assert!(upstream.is_static);
        assert_eq!(upstream.static_code, Some(404));
        assert_eq!(upstream.id, "static://404");
        assert_eq!(upstream.path, "/");
        assert_eq!(upstream.uri, "");
        assert!(!upstream.has_transport_settings());
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_static_invalid_code_falls_back_to_200() {
        let (upstream, diagnostics) = classify("static://abc");

        assert!(upstream.is_static);
        assert_eq!(upstream.static_code, Some(200));
        assert_eq!(
            diagnostics.warnings(),
            &[MigrationWarning::InvalidStaticCode {
                upstream: "static://abc".to_string(),
                host: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_unix_socket_routes_root() {
        let (upstream, _) = classify("unix:///var/run/app.sock");

        assert_eq!(upstream.path, "/");
        assert_eq!(upstream.id, "/var/run/app.sock");
        assert_eq!(upstream.uri, "unix:///var/run/app.sock");
        assert_eq!(upstream.pass_host_header, Some(true));
    }

    #[test]
    fn test_malformed_upstream_fails_whole_list() {
        let legacy = LegacyUpstreams {
            upstreams: vec!["http://ok/".to_string(), "http://[::1/".to_string()],
            ..LegacyUpstreams::default()
        };

        let err = legacy.convert(&mut Diagnostics::new()).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Upstreams { ref upstream, .. } if upstream == "http://[::1/"
        ));
        assert!(err.to_string().starts_with("error converting upstreams"));
    }

    #[test]
    fn test_route_path_is_kept_as_written() {
        let (upstream, _) = classify("http://localhost:8080/a/../b");
        assert_eq!(upstream.id, "/a/../b");
        assert_eq!(upstream.path, "/a/../b");

        let (upstream, _) = classify("http://localhost:8080/a\\b");
        assert_eq!(upstream.path, "/a\\b");
    }

    #[test]
    fn test_route_path_is_percent_decoded() {
        let (upstream, _) = classify("http://localhost:8080/foo%20bar/");
        assert_eq!(upstream.path, "/foo bar/");
        assert_eq!(upstream.uri, "http://localhost:8080/foo%20bar/");

        let (upstream, _) = classify("file:///var/www#my%20route");
        assert_eq!(upstream.id, "my route");
        assert_eq!(upstream.path, "my route");
        assert_eq!(upstream.uri, "file:///var/www");
    }

    #[test]
    fn test_scheme_less_reference_is_networked() {
        let (upstream, diagnostics) = classify("/app");
        assert_eq!(upstream.id, "/app");
        assert_eq!(upstream.path, "/app");
        assert_eq!(upstream.uri, "/app");
        assert!(!upstream.is_static);
        assert_eq!(upstream.pass_host_header, Some(true));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_out_of_range_port_is_accepted() {
        let (upstream, _) = classify("http://localhost:99999");
        assert_eq!(upstream.path, "/");
        assert_eq!(upstream.uri, "http://localhost:99999");
    }

    #[test]
    fn test_static_code_out_of_range_falls_back() {
        let (upstream, diagnostics) = classify("static://70000");
        assert_eq!(upstream.static_code, Some(200));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    proptest! {
        #[test]
        fn http_upstreams_keep_uri_and_default_root_path(
            scheme in "https?",
            host in "[a-z][a-z0-9]{0,15}",
            port in proptest::option::of(1u16..=65535u16),
        ) {
            let raw = match port {
                Some(port) => format!("{scheme}://{host}:{port}"),
                None => format!("{scheme}://{host}"),
            };
            let mut diagnostics = Diagnostics::new();
            let upstream = LegacyUpstreams::default()
                .classify(&raw, &mut diagnostics)
                .unwrap();

            prop_assert_eq!(&upstream.uri, &raw);
            prop_assert_eq!(upstream.path.as_str(), "/");
            prop_assert_eq!(upstream.id.as_str(), "/");
        }
    }
}
