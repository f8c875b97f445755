use super::{Duration, SecretSource};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STANDARD_LOGGING_FORMAT: &str = "[{{.Timestamp}}] [{{.File}}] {{.Message}}";
pub const DEFAULT_AUTH_LOGGING_FORMAT: &str =
    "{{.Client}} - {{.RequestID}} - {{.Username}} [{{.Timestamp}}] [{{.Status}}] {{.Message}}";
pub const DEFAULT_REQUEST_LOGGING_FORMAT: &str = "{{.Client}} - {{.RequestID}} - {{.Username}} \
    [{{.Timestamp}}] {{.Host}} {{.RequestMethod}} {{.Upstream}} {{.RequestURI}} {{.Protocol}} \
    {{.UserAgent}} {{.StatusCode}} {{.ResponseSize}} {{.RequestDuration}}";

pub const DEFAULT_COOKIE_NAME: &str = "_oauth2_proxy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyOptions {
    /// Prefix of the proxy's own endpoints (sign in, callback, ...).
    pub proxy_prefix: String,
    pub reverse_proxy: bool,
    pub real_client_ip_header: String,
    pub trusted_ips: Vec<String>,
    pub force_https: bool,
    pub redirect_url: String,
    pub relative_redirect_url: bool,
    pub whitelist_domains: Vec<String>,
    pub skip_auth_preflight: bool,
    pub skip_auth_regex: Vec<String>,
    pub skip_auth_routes: Vec<String>,
    pub api_routes: Vec<String>,
    pub skip_provider_button: bool,
    pub skip_jwt_bearer_tokens: bool,
    pub extra_jwt_issuers: Vec<String>,
    pub email_domains: Vec<String>,
    pub authenticated_emails_file: String,
    pub encode_state: bool,
    pub ssl_insecure_skip_verify: bool,
    /// Carried over from the legacy header flags.
    pub legacy_prefer_email_to_user: bool,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            proxy_prefix: "/oauth2".to_string(),
            reverse_proxy: false,
            real_client_ip_header: "X-Real-IP".to_string(),
            trusted_ips: Vec::new(),
            force_https: false,
            redirect_url: String::new(),
            relative_redirect_url: false,
            whitelist_domains: Vec::new(),
            skip_auth_preflight: false,
            skip_auth_regex: Vec::new(),
            skip_auth_routes: Vec::new(),
            api_routes: Vec::new(),
            skip_provider_button: false,
            skip_jwt_bearer_tokens: false,
            extra_jwt_issuers: Vec::new(),
            email_domains: Vec::new(),
            authenticated_emails_file: String::new(),
            encode_state: false,
            ssl_insecure_skip_verify: false,
            legacy_prefer_email_to_user: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeOptions {
    pub ping_path: String,
    pub ping_user_agent: String,
    pub ready_path: String,
    pub legacy_gcp_health_checks: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            ping_path: "/ping".to_string(),
            ping_user_agent: String::new(),
            ready_path: "/ready".to_string(),
            legacy_gcp_health_checks: false,
        }
    }
}

/// An HTTP and/or HTTPS listener. Either address may be empty to disable it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Server {
    pub bind_address: String,
    pub secure_bind_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<Tls>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tls {
    pub key: SecretSource,
    pub cert: SecretSource,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub min_version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cipher_suites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Cookie {
    pub name: String,
    pub secret: String,
    pub secret_file: String,
    pub domains: Vec<String>,
    pub path: String,
    pub expire: Duration,
    pub refresh: Duration,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: String,
    pub csrf_per_request: bool,
    pub csrf_per_request_limit: u32,
    pub csrf_expire: Duration,
}

impl Default for Cookie {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            secret: String::new(),
            secret_file: String::new(),
            domains: Vec::new(),
            path: "/".to_string(),
            expire: Duration::from_hours(168),
            refresh: Duration::ZERO,
            secure: true,
            http_only: true,
            same_site: String::new(),
            csrf_per_request: false,
            csrf_per_request_limit: 0,
            csrf_expire: Duration::from_mins(15),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreType {
    #[default]
    Cookie,
    Redis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOptions {
    #[serde(rename = "type")]
    pub store_type: SessionStoreType,
    pub cookie: CookieStoreOptions,
    pub redis: RedisStoreOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CookieStoreOptions {
    /// Strip tokens from the session cookie to keep it small.
    pub minimal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedisStoreOptions {
    pub connection_url: String,
    pub username: String,
    pub password: String,
    pub use_sentinel: bool,
    pub sentinel_password: String,
    pub sentinel_master_name: String,
    pub sentinel_connection_urls: Vec<String>,
    pub use_cluster: bool,
    pub cluster_connection_urls: Vec<String>,
    pub ca_path: String,
    pub insecure_skip_tls_verify: bool,
    /// Zero keeps idle connections open indefinitely.
    pub idle_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub auth_enabled: bool,
    pub auth_format: String,
    pub request_enabled: bool,
    pub request_format: String,
    pub standard_enabled: bool,
    pub standard_format: String,
    pub err_to_info: bool,
    pub exclude_paths: Vec<String>,
    pub local_time: bool,
    pub silence_ping: bool,
    pub request_id_header: String,
    pub file: LogFileOptions,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            auth_enabled: true,
            auth_format: DEFAULT_AUTH_LOGGING_FORMAT.to_string(),
            request_enabled: true,
            request_format: DEFAULT_REQUEST_LOGGING_FORMAT.to_string(),
            standard_enabled: true,
            standard_format: DEFAULT_STANDARD_LOGGING_FORMAT.to_string(),
            err_to_info: false,
            exclude_paths: Vec::new(),
            local_time: true,
            silence_ping: false,
            request_id_header: "X-Request-Id".to_string(),
            file: LogFileOptions::default(),
        }
    }
}

/// Rotation settings. An empty filename logs to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogFileOptions {
    pub filename: String,
    /// Megabytes.
    pub max_size: u32,
    /// Days.
    pub max_age: u32,
    pub max_backups: u32,
    pub compress: bool,
}

impl Default for LogFileOptions {
    fn default() -> Self {
        Self {
            filename: String::new(),
            max_size: 100,
            max_age: 7,
            max_backups: 0,
            compress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageTemplates {
    /// Directory holding `sign_in.html` and `error.html` overrides.
    pub path: String,
    pub custom_logo: String,
    pub banner: String,
    pub footer: String,
    pub display_login_form: bool,
    pub debug: bool,
}

impl Default for PageTemplates {
    fn default() -> Self {
        Self {
            path: String::new(),
            custom_logo: String::new(),
            banner: String::new(),
            footer: String::new(),
            display_login_form: true,
            debug: false,
        }
    }
}
