use crate::config::{
    Cookie, CookieStoreOptions, DEFAULT_COOKIE_NAME, Duration, RedisStoreOptions, SessionOptions,
    SessionStoreType,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyCookie {
    #[serde(rename = "cookie_name")]
    pub name: String,
    #[serde(rename = "cookie_secret")]
    pub secret: String,
    #[serde(rename = "cookie_secret_file")]
    pub secret_file: String,
    #[serde(rename = "cookie_domains")]
    pub domains: Vec<String>,
    #[serde(rename = "cookie_path")]
    pub path: String,
    #[serde(rename = "cookie_expire")]
    pub expire: Duration,
    #[serde(rename = "cookie_refresh")]
    pub refresh: Duration,
    #[serde(rename = "cookie_secure")]
    pub secure: bool,
    #[serde(rename = "cookie_httponly")]
    pub http_only: bool,
    #[serde(rename = "cookie_samesite")]
    pub same_site: String,
    #[serde(rename = "cookie_csrf_per_request")]
    pub csrf_per_request: bool,
    #[serde(rename = "cookie_csrf_per_request_limit")]
    pub csrf_per_request_limit: u32,
    #[serde(rename = "cookie_csrf_expire")]
    pub csrf_expire: Duration,
}

impl Default for LegacyCookie {
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

impl LegacyCookie {
    pub fn convert(&self) -> Cookie {
        Cookie {
            name: self.name.clone(),
            secret: self.secret.clone(),
            secret_file: self.secret_file.clone(),
            domains: self.domains.clone(),
            path: self.path.clone(),
            expire: self.expire,
            refresh: self.refresh,
            secure: self.secure,
            http_only: self.http_only,
            same_site: self.same_site.clone(),
            csrf_per_request: self.csrf_per_request,
            csrf_per_request_limit: self.csrf_per_request_limit,
            csrf_expire: self.csrf_expire,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySessionOptions {
    #[serde(rename = "session_store_type")]
    pub store_type: SessionStoreType,
    #[serde(rename = "session_cookie_minimal")]
    pub cookie_minimal: bool,

    pub redis_connection_url: String,
    pub redis_username: String,
    pub redis_password: String,
    pub redis_use_sentinel: bool,
    pub redis_sentinel_password: String,
    pub redis_sentinel_master_name: String,
    pub redis_sentinel_connection_urls: Vec<String>,
    pub redis_use_cluster: bool,
    pub redis_cluster_connection_urls: Vec<String>,
    pub redis_ca_path: String,
    pub redis_insecure_skip_tls_verify: bool,
    pub redis_connection_idle_timeout: Duration,
}

impl LegacySessionOptions {
    pub fn convert(&self) -> SessionOptions {
        SessionOptions {
            store_type: self.store_type,
            cookie: CookieStoreOptions {
                minimal: self.cookie_minimal,
            },
            redis: RedisStoreOptions {
                connection_url: self.redis_connection_url.clone(),
                username: self.redis_username.clone(),
                password: self.redis_password.clone(),
                use_sentinel: self.redis_use_sentinel,
                sentinel_password: self.redis_sentinel_password.clone(),
                sentinel_master_name: self.redis_sentinel_master_name.clone(),
                sentinel_connection_urls: self.redis_sentinel_connection_urls.clone(),
                use_cluster: self.redis_use_cluster,
                cluster_connection_urls: self.redis_cluster_connection_urls.clone(),
                ca_path: self.redis_ca_path.clone(),
                insecure_skip_tls_verify: self.redis_insecure_skip_tls_verify,
                idle_timeout: self.redis_connection_idle_timeout,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_defaults_match_structured_defaults() {
        assert_eq!(LegacyCookie::default().convert(), Cookie::default());
    }

    #[test]
    fn test_session_redis_settings() {
        let legacy = LegacySessionOptions {
            store_type: SessionStoreType::Redis,
            redis_connection_url: "redis://cache:6379".to_string(),
            redis_use_cluster: true,
            redis_cluster_connection_urls: vec!["redis://c1:6379".to_string()],
            redis_connection_idle_timeout: Duration::from_secs(300),
            ..LegacySessionOptions::default()
        };

        let session = legacy.convert();

        assert_eq!(session.store_type, SessionStoreType::Redis);
        assert_eq!(session.redis.connection_url, "redis://cache:6379");
        assert!(session.redis.use_cluster);
        assert_eq!(session.redis.cluster_connection_urls.len(), 1);
        assert_eq!(session.redis.idle_timeout, Duration::from_secs(300));
        assert!(!session.cookie.minimal);
    }
}
