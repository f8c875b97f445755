use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use url::Url;

/// Verifies raw ID tokens for one issuer. Implemented by the OIDC client.
pub trait IdTokenVerifier: fmt::Debug + Send + Sync {
    fn issuer(&self) -> &str;

    /// Returns the verified claim set.
    fn verify(&self, raw_id_token: &str) -> anyhow::Result<serde_json::Value>;
}

/// Extracts the real client address from a forwarded-for style header value.
pub trait RealClientIpParser: fmt::Debug + Send + Sync {
    fn parse(&self, header_value: &str) -> Option<IpAddr>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureHash {
    Sha1,
    Sha256,
    Sha512,
}

/// Key and digest used to sign requests sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureData {
    pub hash: SignatureHash,
    pub key: String,
}

/// Values resolved after validation. Never read from or written to config files.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuntimeState {
    pub(crate) redirect_url: Option<Url>,
    pub(crate) signature_data: Option<SignatureData>,
    pub(crate) oidc_verifier: Option<Arc<dyn IdTokenVerifier>>,
    pub(crate) jwt_bearer_verifiers: Vec<Arc<dyn IdTokenVerifier>>,
    pub(crate) real_client_ip_parser: Option<Arc<dyn RealClientIpParser>>,
}
