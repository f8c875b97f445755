//! Migration from the flat legacy option set to the structured [`Config`].
//!
//! The legacy options are one flat key space accumulated over many releases.
//! [`LegacyConfig::migrate`] rebuilds each structured section from it and
//! reports non-fatal findings as [`MigrationWarning`]s next to the result.

mod cookie;
mod deprecation;
mod headers;
mod logging;
mod provider;
mod proxy;
mod server;
mod upstreams;
mod uri;

pub use cookie::{LegacyCookie, LegacySessionOptions};
pub use deprecation::{
    Diagnostics, MigrationWarning, forced_code_challenge_fills_gap, legacy_google_groups_win,
};
pub use headers::LegacyHeaders;
pub use logging::LegacyLogging;
pub use provider::LegacyProvider;
pub use proxy::{LegacyPageTemplates, LegacyProbeOptions, LegacyProxyOptions};
pub use server::LegacyServer;
pub use upstreams::LegacyUpstreams;

use crate::config::Config;
use crate::error::MigrationResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyConfig {
    #[serde(flatten)]
    pub upstreams: LegacyUpstreams,

    #[serde(flatten)]
    pub headers: LegacyHeaders,

    #[serde(flatten)]
    pub server: LegacyServer,

    #[serde(flatten)]
    pub provider: LegacyProvider,

    #[serde(flatten)]
    pub cookie: LegacyCookie,

    #[serde(flatten)]
    pub session: LegacySessionOptions,

    #[serde(flatten)]
    pub logging: LegacyLogging,

    #[serde(flatten)]
    pub page_templates: LegacyPageTemplates,

    #[serde(flatten)]
    pub proxy: LegacyProxyOptions,

    #[serde(flatten)]
    pub probe: LegacyProbeOptions,
}

/// A migrated configuration and the warnings raised while building it.
#[derive(Debug)]
pub struct Migration {
    pub config: Config,
    pub warnings: Vec<MigrationWarning>,
}

impl LegacyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read legacy config file: {:?}", path))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse legacy config file: {:?}", path))
    }

    /// Keys missing from `content` keep their flag defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(content)?)
    }

    /// Builds the structured configuration. Fails on the first upstream or
    /// provider that cannot be converted; `self` is never modified.
    pub fn migrate(&self) -> MigrationResult<Migration> {
        let mut diagnostics = Diagnostics::new();
        let mut config = Config::default();

        config.proxy_options = self.proxy.convert();
        config.proxy_options.legacy_prefer_email_to_user = self.headers.prefer_email_to_user;

        config.probe_options = self.probe.convert();

        config.upstream_config = self.upstreams.convert(&mut diagnostics)?;

        (config.inject_request_headers, config.inject_response_headers) = self.headers.convert();

        (config.server, config.metrics_server) = self.server.convert();

        config.cookie = self.cookie.convert();

        config.session = self.session.convert();

        config.logging = self.logging.convert();

        config.page_templates = self.page_templates.convert();

        config.providers = self.provider.convert(&mut diagnostics)?;

        debug!(
            upstreams = config.upstream_config.upstreams.len(),
            providers = config.providers.len(),
            warnings = diagnostics.warnings().len(),
            "Migrated legacy configuration"
        );

        Ok(Migration {
            config,
            warnings: diagnostics.into_warnings(),
        })
    }
}
