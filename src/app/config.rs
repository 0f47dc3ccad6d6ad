use std::env;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_SCHEME: &str = "app";
pub const DEFAULT_MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Scheme used by [crate::Router::build_url].
    pub default_scheme: String,
    /// Redirects and fallback navigations followed before giving up.
    pub max_redirects: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_scheme: DEFAULT_SCHEME.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl RouterConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid router config")
    }

    /// Defaults overridden by `ROUTER_SCHEME` and `ROUTER_MAX_REDIRECTS`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(scheme) = env::var("ROUTER_SCHEME") {
            config.default_scheme = scheme;
        }
        if let Ok(max_redirects) = env::var("ROUTER_MAX_REDIRECTS") {
            config.max_redirects = max_redirects
                .parse()
                .with_context(|| format!("Invalid ROUTER_MAX_REDIRECTS: {max_redirects}"))?;
        }
        Ok(config)
    }
}
