use crate::config::{PageTemplates, ProbeOptions, ProxyOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProxyOptions {
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
}

impl Default for LegacyProxyOptions {
    fn default() -> Self {
        let defaults = ProxyOptions::default();
        Self {
            proxy_prefix: defaults.proxy_prefix,
            reverse_proxy: false,
            real_client_ip_header: defaults.real_client_ip_header,
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
        }
    }
}

impl LegacyProxyOptions {
    /// `legacy_prefer_email_to_user` is filled in from the header flags by the caller.
    pub fn convert(&self) -> ProxyOptions {
        ProxyOptions {
            proxy_prefix: self.proxy_prefix.clone(),
            reverse_proxy: self.reverse_proxy,
            real_client_ip_header: self.real_client_ip_header.clone(),
            trusted_ips: self.trusted_ips.clone(),
            force_https: self.force_https,
            redirect_url: self.redirect_url.clone(),
            relative_redirect_url: self.relative_redirect_url,
            whitelist_domains: self.whitelist_domains.clone(),
            skip_auth_preflight: self.skip_auth_preflight,
            skip_auth_regex: self.skip_auth_regex.clone(),
            skip_auth_routes: self.skip_auth_routes.clone(),
            api_routes: self.api_routes.clone(),
            skip_provider_button: self.skip_provider_button,
            skip_jwt_bearer_tokens: self.skip_jwt_bearer_tokens,
            extra_jwt_issuers: self.extra_jwt_issuers.clone(),
            email_domains: self.email_domains.clone(),
            authenticated_emails_file: self.authenticated_emails_file.clone(),
            encode_state: self.encode_state,
            ssl_insecure_skip_verify: self.ssl_insecure_skip_verify,
            legacy_prefer_email_to_user: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProbeOptions {
    pub ping_path: String,
    pub ping_user_agent: String,
    pub ready_path: String,
    #[serde(rename = "gcp_healthchecks")]
    pub gcp_health_checks: bool,
}

impl Default for LegacyProbeOptions {
    fn default() -> Self {
        Self {
            ping_path: "/ping".to_string(),
            ping_user_agent: String::new(),
            ready_path: "/ready".to_string(),
            gcp_health_checks: false,
        }
    }
}

impl LegacyProbeOptions {
    pub fn convert(&self) -> ProbeOptions {
        ProbeOptions {
            ping_path: self.ping_path.clone(),
            ping_user_agent: self.ping_user_agent.clone(),
            ready_path: self.ready_path.clone(),
            legacy_gcp_health_checks: self.gcp_health_checks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyPageTemplates {
    #[serde(rename = "custom_templates_dir")]
    pub path: String,
    #[serde(rename = "custom_sign_in_logo")]
    pub custom_logo: String,
    pub banner: String,
    pub footer: String,
    #[serde(rename = "display_htpasswd_form")]
    pub display_login_form: bool,
    #[serde(rename = "show_debug_on_error")]
    pub debug: bool,
}

impl Default for LegacyPageTemplates {
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

impl LegacyPageTemplates {
    pub fn convert(&self) -> PageTemplates {
        PageTemplates {
            path: self.path.clone(),
            custom_logo: self.custom_logo.clone(),
            banner: self.banner.clone(),
            footer: self.footer.clone(),
            display_login_form: self.display_login_form,
            debug: self.debug,
        }
    }
}
