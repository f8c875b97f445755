use super::deprecation::{
    Diagnostics, forced_code_challenge_fills_gap, legacy_google_groups_win,
};
use crate::config::{
    AzureOptions, BitbucketOptions, DEFAULT_AZURE_TENANT, GitHubOptions, GitLabOptions,
    GoogleOptions, KeycloakOptions, LoginGovOptions, LoginUrlParameter, OIDC_AUDIENCE_CLAIM,
    OIDC_EMAIL_CLAIM, OIDC_GROUPS_CLAIM, OidcOptions, Provider, ProviderKind, ProviderType,
};
use crate::error::ProviderConversionError;
use serde::{Deserialize, Serialize};

/// The single-provider flag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProvider {
    pub client_id: String,
    pub client_secret: String,
    pub client_secret_file: String,

    pub keycloak_groups: Vec<String>,
    pub azure_tenant: String,
    pub azure_graph_group_field: String,
    pub bitbucket_team: String,
    pub bitbucket_repository: String,
    pub github_org: String,
    pub github_team: String,
    pub github_repo: String,
    pub github_token: String,
    pub github_users: Vec<String>,
    pub gitlab_groups: Vec<String>,
    pub gitlab_projects: Vec<String>,
    /// Deprecated spelling of `google_groups`.
    pub google_group: Vec<String>,
    pub google_groups: Vec<String>,
    pub google_admin_email: String,
    pub google_service_account_json: String,
    pub google_use_application_default_credentials: bool,
    pub google_target_principal: String,

    #[serde(rename = "provider")]
    pub provider_type: String,
    #[serde(rename = "provider_display_name")]
    pub provider_name: String,
    pub provider_ca_files: Vec<String>,
    pub use_system_trust_store: bool,
    pub oidc_issuer_url: String,
    pub insecure_oidc_allow_unverified_email: bool,
    pub insecure_oidc_skip_issuer_verification: bool,
    pub insecure_oidc_skip_nonce: bool,
    pub skip_oidc_discovery: bool,
    pub oidc_jwks_url: String,
    pub oidc_email_claim: String,
    pub oidc_groups_claim: String,
    pub oidc_audience_claims: Vec<String>,
    pub oidc_extra_audiences: Vec<String>,
    pub login_url: String,
    pub redeem_url: String,
    pub profile_url: String,
    pub skip_claims_from_profile_url: bool,
    #[serde(rename = "resource")]
    pub protected_resource: String,
    pub validate_url: String,
    pub scope: String,
    pub prompt: String,
    /// Superseded by `prompt` in OIDC 1.0.
    pub approval_prompt: String,
    pub user_id_claim: String,
    pub allowed_groups: Vec<String>,
    pub allowed_roles: Vec<String>,
    pub backend_logout_url: String,

    pub acr_values: String,
    pub jwt_key: String,
    pub jwt_key_file: String,
    #[serde(rename = "pubjwk_url")]
    pub pub_jwk_url: String,
    /// `S256` or `plain`.
    pub code_challenge_method: String,
    /// Deprecated spelling of `code_challenge_method`.
    pub force_code_challenge_method: String,
}

impl Default for LegacyProvider {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            client_secret_file: String::new(),
            keycloak_groups: Vec::new(),
            azure_tenant: DEFAULT_AZURE_TENANT.to_string(),
            azure_graph_group_field: String::new(),
            bitbucket_team: String::new(),
            bitbucket_repository: String::new(),
            github_org: String::new(),
            github_team: String::new(),
            github_repo: String::new(),
            github_token: String::new(),
            github_users: Vec::new(),
            gitlab_groups: Vec::new(),
            gitlab_projects: Vec::new(),
            google_group: Vec::new(),
            google_groups: Vec::new(),
            google_admin_email: String::new(),
            google_service_account_json: String::new(),
            google_use_application_default_credentials: false,
            google_target_principal: String::new(),
            provider_type: ProviderType::Google.as_str().to_string(),
            provider_name: String::new(),
            provider_ca_files: Vec::new(),
            use_system_trust_store: false,
            oidc_issuer_url: String::new(),
            insecure_oidc_allow_unverified_email: false,
            insecure_oidc_skip_issuer_verification: false,
            insecure_oidc_skip_nonce: true,
            skip_oidc_discovery: false,
            oidc_jwks_url: String::new(),
            oidc_email_claim: OIDC_EMAIL_CLAIM.to_string(),
            oidc_groups_claim: OIDC_GROUPS_CLAIM.to_string(),
            oidc_audience_claims: vec![OIDC_AUDIENCE_CLAIM.to_string()],
            oidc_extra_audiences: Vec::new(),
            login_url: String::new(),
            redeem_url: String::new(),
            profile_url: String::new(),
            skip_claims_from_profile_url: false,
            protected_resource: String::new(),
            validate_url: String::new(),
            scope: String::new(),
            prompt: String::new(),
            approval_prompt: "force".to_string(),
            user_id_claim: OIDC_EMAIL_CLAIM.to_string(),
            allowed_groups: Vec::new(),
            allowed_roles: Vec::new(),
            backend_logout_url: String::new(),
            acr_values: String::new(),
            jwt_key: String::new(),
            jwt_key_file: String::new(),
            pub_jwk_url: String::new(),
            code_challenge_method: String::new(),
            force_code_challenge_method: String::new(),
        }
    }
}

impl LegacyProvider {
    pub fn convert(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Provider>, ProviderConversionError> {
        let provider_type: ProviderType = self
            .provider_type
            .parse()
            .map_err(|_| ProviderConversionError::UnknownType(self.provider_type.clone()))?;

        let (id, name) = if self.provider_name.is_empty() {
            (format!("{}={}", self.provider_type, self.client_id), String::new())
        } else {
            (self.provider_name.clone(), self.provider_name.clone())
        };

        let provider = Provider {
            id,
            name,
            kind: self.provider_kind(provider_type, diagnostics),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            client_secret_file: self.client_secret_file.clone(),
            ca_files: self.provider_ca_files.clone(),
            use_system_trust_store: self.use_system_trust_store,
            login_url: self.login_url.clone(),
            login_url_parameters: self.login_url_parameters(),
            redeem_url: self.redeem_url.clone(),
            profile_url: self.profile_url.clone(),
            skip_claims_from_profile_url: self.skip_claims_from_profile_url,
            protected_resource: self.protected_resource.clone(),
            validate_url: self.validate_url.clone(),
            scope: self.scope.clone(),
            allowed_groups: self.allowed_groups.clone(),
            code_challenge_method: forced_code_challenge_fills_gap(
                &self.code_challenge_method,
                &self.force_code_challenge_method,
                diagnostics,
            ),
            backend_logout_url: self.backend_logout_url.clone(),
            // Every provider may use OIDC claims, so this is always populated.
            oidc_config: OidcOptions {
                issuer_url: self.oidc_issuer_url.clone(),
                insecure_allow_unverified_email: self.insecure_oidc_allow_unverified_email,
                insecure_skip_issuer_verification: self.insecure_oidc_skip_issuer_verification,
                insecure_skip_nonce: self.insecure_oidc_skip_nonce,
                skip_discovery: self.skip_oidc_discovery,
                jwks_url: self.oidc_jwks_url.clone(),
                user_id_claim: self.user_id_claim.clone(),
                email_claim: self.oidc_email_claim.clone(),
                groups_claim: self.oidc_groups_claim.clone(),
                audience_claims: self.oidc_audience_claims.clone(),
                extra_audiences: self.oidc_extra_audiences.clone(),
            },
            // Always populated so the default tenant survives migration.
            azure_config: AzureOptions {
                tenant: self.azure_tenant.clone(),
                graph_group_field: self.azure_graph_group_field.clone(),
            },
        };

        Ok(vec![provider])
    }

    fn provider_kind(
        &self,
        provider_type: ProviderType,
        diagnostics: &mut Diagnostics,
    ) -> ProviderKind {
        match provider_type {
            ProviderType::GitHub => ProviderKind::GitHub(GitHubOptions {
                org: self.github_org.clone(),
                team: self.github_team.clone(),
                repo: self.github_repo.clone(),
                token: self.github_token.clone(),
                users: self.github_users.clone(),
            }),
            ProviderType::KeycloakOidc => ProviderKind::KeycloakOidc(KeycloakOptions {
                groups: self.keycloak_groups.clone(),
                roles: self.allowed_roles.clone(),
            }),
            ProviderType::Keycloak => ProviderKind::Keycloak(KeycloakOptions {
                groups: self.keycloak_groups.clone(),
                roles: Vec::new(),
            }),
            ProviderType::GitLab => ProviderKind::GitLab(GitLabOptions {
                group: self.gitlab_groups.clone(),
                projects: self.gitlab_projects.clone(),
            }),
            ProviderType::LoginGov => ProviderKind::LoginGov(LoginGovOptions {
                jwt_key: self.jwt_key.clone(),
                jwt_key_file: self.jwt_key_file.clone(),
                pub_jwk_url: self.pub_jwk_url.clone(),
            }),
            ProviderType::Bitbucket => ProviderKind::Bitbucket(BitbucketOptions {
                team: self.bitbucket_team.clone(),
                repository: self.bitbucket_repository.clone(),
            }),
            ProviderType::Google => ProviderKind::Google(GoogleOptions {
                groups: legacy_google_groups_win(
                    &self.google_group,
                    &self.google_groups,
                    diagnostics,
                ),
                admin_email: self.google_admin_email.clone(),
                service_account_json: self.google_service_account_json.clone(),
                use_application_default_credentials: self
                    .google_use_application_default_credentials,
                target_principal: self.google_target_principal.clone(),
            }),
            ProviderType::Adfs => ProviderKind::Adfs,
            ProviderType::Azure => ProviderKind::Azure,
            ProviderType::DigitalOcean => ProviderKind::DigitalOcean,
            ProviderType::Facebook => ProviderKind::Facebook,
            ProviderType::LinkedIn => ProviderKind::LinkedIn,
            ProviderType::Nextcloud => ProviderKind::Nextcloud,
            ProviderType::Oidc => ProviderKind::Oidc,
        }
    }

    /// `acr_values` is independent of the prompt family; within the prompt
    /// family the first set value wins and `approval_prompt=force` is the fallback.
    fn login_url_parameters(&self) -> Vec<LoginUrlParameter> {
        let mut params = Vec::new();

        if !self.acr_values.is_empty() {
            params.push(LoginUrlParameter::new("acr_values", self.acr_values.as_str()));
        }

        let prompt = if !self.prompt.is_empty() {
            LoginUrlParameter::new("prompt", self.prompt.as_str())
        } else if !self.approval_prompt.is_empty() {
            LoginUrlParameter::new("approval_prompt", self.approval_prompt.as_str())
        } else {
            LoginUrlParameter::new("approval_prompt", "force")
        };
        params.push(prompt);

        params
    }
}
