use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OIDC_EMAIL_CLAIM: &str = "email";
pub const OIDC_GROUPS_CLAIM: &str = "groups";
pub const OIDC_AUDIENCE_CLAIM: &str = "aud";
pub const DEFAULT_AZURE_TENANT: &str = "common";

/// Provider tags understood by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    Adfs,
    Azure,
    Bitbucket,
    DigitalOcean,
    Facebook,
    GitHub,
    GitLab,
    Google,
    Keycloak,
    KeycloakOidc,
    LinkedIn,
    LoginGov,
    Nextcloud,
    Oidc,
}

impl ProviderType {
    pub const ALL: [ProviderType; 14] = [
        ProviderType::Adfs,
        ProviderType::Azure,
        ProviderType::Bitbucket,
        ProviderType::DigitalOcean,
        ProviderType::Facebook,
        ProviderType::GitHub,
        ProviderType::GitLab,
        ProviderType::Google,
        ProviderType::Keycloak,
        ProviderType::KeycloakOidc,
        ProviderType::LinkedIn,
        ProviderType::LoginGov,
        ProviderType::Nextcloud,
        ProviderType::Oidc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Adfs => "adfs",
            ProviderType::Azure => "azure",
            ProviderType::Bitbucket => "bitbucket",
            ProviderType::DigitalOcean => "digitalocean",
            ProviderType::Facebook => "facebook",
            ProviderType::GitHub => "github",
            ProviderType::GitLab => "gitlab",
            ProviderType::Google => "google",
            ProviderType::Keycloak => "keycloak",
            ProviderType::KeycloakOidc => "keycloak-oidc",
            ProviderType::LinkedIn => "linkedin",
            ProviderType::LoginGov => "login.gov",
            ProviderType::Nextcloud => "nextcloud",
            ProviderType::Oidc => "oidc",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider type {0:?}")]
pub struct UnknownProviderType(pub String);

impl FromStr for ProviderType {
    type Err = UnknownProviderType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownProviderType(s.to_string()))
    }
}

/// The provider-specific payload. Exactly one variant exists per provider
/// and it always matches the provider's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderKind {
    #[serde(rename = "adfs")]
    Adfs,
    #[serde(rename = "azure")]
    Azure,
    #[serde(rename = "bitbucket")]
    Bitbucket(BitbucketOptions),
    #[serde(rename = "digitalocean")]
    DigitalOcean,
    #[serde(rename = "facebook")]
    Facebook,
    #[serde(rename = "github")]
    GitHub(GitHubOptions),
    #[serde(rename = "gitlab")]
    GitLab(GitLabOptions),
    #[serde(rename = "google")]
    Google(GoogleOptions),
    #[serde(rename = "keycloak")]
    Keycloak(KeycloakOptions),
    #[serde(rename = "keycloak-oidc")]
    KeycloakOidc(KeycloakOptions),
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[serde(rename = "login.gov")]
    LoginGov(LoginGovOptions),
    #[serde(rename = "nextcloud")]
    Nextcloud,
    #[serde(rename = "oidc")]
    Oidc,
}

impl ProviderKind {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderKind::Adfs => ProviderType::Adfs,
            ProviderKind::Azure => ProviderType::Azure,
            ProviderKind::Bitbucket(_) => ProviderType::Bitbucket,
            ProviderKind::DigitalOcean => ProviderType::DigitalOcean,
            ProviderKind::Facebook => ProviderType::Facebook,
            ProviderKind::GitHub(_) => ProviderType::GitHub,
            ProviderKind::GitLab(_) => ProviderType::GitLab,
            ProviderKind::Google(_) => ProviderType::Google,
            ProviderKind::Keycloak(_) => ProviderType::Keycloak,
            ProviderKind::KeycloakOidc(_) => ProviderType::KeycloakOidc,
            ProviderKind::LinkedIn => ProviderType::LinkedIn,
            ProviderKind::LoginGov(_) => ProviderType::LoginGov,
            ProviderKind::Nextcloud => ProviderType::Nextcloud,
            ProviderKind::Oidc => ProviderType::Oidc,
        }
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Google(GoogleOptions::default())
    }
}

/// One identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(flatten)]
    pub kind: ProviderKind,

    #[serde(default)]
    pub client_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret_file: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ca_files: Vec<String>,

    #[serde(default)]
    pub use_system_trust_store: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login_url: String,

    /// Defaults appended to the authorization URL.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub login_url_parameters: Vec<LoginUrlParameter>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redeem_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile_url: String,

    #[serde(default)]
    pub skip_claims_from_profile_url: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protected_resource: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub validate_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_groups: Vec<String>,

    /// PKCE method, `S256` or `plain`. Empty disables PKCE.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code_challenge_method: String,

    /// `{id_token}` is replaced with the session's ID token.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub backend_logout_url: String,

    #[serde(default)]
    pub oidc_config: OidcOptions,

    #[serde(default)]
    pub azure_config: AzureOptions,
}

impl Provider {
    pub fn provider_type(&self) -> ProviderType {
        self.kind.provider_type()
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: ProviderKind::default(),
            client_id: String::new(),
            client_secret: String::new(),
            client_secret_file: String::new(),
            ca_files: Vec::new(),
            use_system_trust_store: false,
            login_url: String::new(),
            login_url_parameters: Vec::new(),
            redeem_url: String::new(),
            profile_url: String::new(),
            skip_claims_from_profile_url: false,
            protected_resource: String::new(),
            validate_url: String::new(),
            scope: String::new(),
            allowed_groups: Vec::new(),
            code_challenge_method: String::new(),
            backend_logout_url: String::new(),
            oidc_config: OidcOptions::default(),
            azure_config: AzureOptions::default(),
        }
    }
}

/// A named query parameter added to the login URL, with its default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginUrlParameter {
    pub name: String,

    #[serde(default)]
    pub default: Vec<String>,
}

impl LoginUrlParameter {
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: vec![default.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OidcOptions {
    pub issuer_url: String,
    pub insecure_allow_unverified_email: bool,
    pub insecure_skip_issuer_verification: bool,
    pub insecure_skip_nonce: bool,
    pub skip_discovery: bool,
    pub jwks_url: String,
    /// Superseded by `email_claim`.
    pub user_id_claim: String,
    pub email_claim: String,
    pub groups_claim: String,
    pub audience_claims: Vec<String>,
    pub extra_audiences: Vec<String>,
}

impl Default for OidcOptions {
    fn default() -> Self {
        Self {
            issuer_url: String::new(),
            insecure_allow_unverified_email: false,
            insecure_skip_issuer_verification: false,
            insecure_skip_nonce: true,
            skip_discovery: false,
            jwks_url: String::new(),
            user_id_claim: OIDC_EMAIL_CLAIM.to_string(),
            email_claim: OIDC_EMAIL_CLAIM.to_string(),
            groups_claim: OIDC_GROUPS_CLAIM.to_string(),
            audience_claims: vec![OIDC_AUDIENCE_CLAIM.to_string()],
            extra_audiences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AzureOptions {
    pub tenant: String,
    /// `id` or `displayName`.
    pub graph_group_field: String,
}

impl Default for AzureOptions {
    fn default() -> Self {
        Self {
            tenant: DEFAULT_AZURE_TENANT.to_string(),
            graph_group_field: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitbucketOptions {
    pub team: String,
    pub repository: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubOptions {
    pub org: String,
    pub team: String,
    pub repo: String,
    pub token: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabOptions {
    pub group: Vec<String>,
    /// `group/project=accesslevel`
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleOptions {
    pub groups: Vec<String>,
    pub admin_email: String,
    pub service_account_json: String,
    pub use_application_default_credentials: bool,
    pub target_principal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeycloakOptions {
    pub groups: Vec<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginGovOptions {
    pub jwt_key: String,
    pub jwt_key_file: String,
    pub pub_jwk_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_round_trips_through_str() {
        for t in ProviderType::ALL {
            assert_eq!(t.as_str().parse::<ProviderType>().unwrap(), t);
        }
        assert!("myspace".parse::<ProviderType>().is_err());
    }

    #[test]
    fn test_kind_matches_type() {
        let kind = ProviderKind::KeycloakOidc(KeycloakOptions::default());
        assert_eq!(kind.provider_type(), ProviderType::KeycloakOidc);
        assert_eq!(ProviderKind::default().provider_type(), ProviderType::Google);
    }

    #[test]
    fn test_provider_yaml_with_variant_payload() {
        let yaml = r#"
id: github=abc
type: github
client_id: abc
org: my-org
users:
  - alice
"#;
        let provider: Provider = serde_yml::from_str(yaml).unwrap();
        assert_eq!(provider.provider_type(), ProviderType::GitHub);
        match &provider.kind {
            ProviderKind::GitHub(github) => {
                assert_eq!(github.org, "my-org");
                assert_eq!(github.users, vec!["alice".to_string()]);
            }
            other => panic!("unexpected provider kind: {:?}", other),
        }
        assert_eq!(provider.azure_config.tenant, "common");
        assert!(provider.oidc_config.insecure_skip_nonce);
    }

    #[test]
    fn test_provider_yaml_unit_variant() {
        let yaml = r#"
id: oidc=abc
type: oidc
client_id: abc
"#;
        let provider: Provider = serde_yml::from_str(yaml).unwrap();
        assert_eq!(provider.kind, ProviderKind::Oidc);
    }
}
