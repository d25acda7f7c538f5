use std::fmt;

use serde::{Deserialize, Serialize};

/// How the controller routes its API paths.
///
/// Determines the login endpoint and the prefix applied to every
/// site-scoped call. Configured per site, never probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingVariant {
    /// Standalone Network Application -- no prefix, `/api/login`.
    #[default]
    Direct,
    /// UniFi OS gateway (UDM, UDM Pro, UCG) -- `/proxy/network` prefix,
    /// `/api/auth/login`.
    GatewayProxied,
}

impl RoutingVariant {
    /// Map the config file's `udmp` flag onto a variant.
    pub fn from_udmp(udmp: bool) -> Self {
        if udmp {
            Self::GatewayProxied
        } else {
            Self::Direct
        }
    }

    /// The login endpoint path, resolved against the controller root.
    ///
    /// The proxy prefix never applies here.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Direct => "/api/login",
            Self::GatewayProxied => "/api/auth/login",
        }
    }

    /// The prefix inserted between the controller root and `/api/...`
    /// for every call except login.
    pub fn api_prefix(self) -> &'static str {
        match self {
            Self::Direct => "",
            Self::GatewayProxied => "/proxy/network",
        }
    }
}

impl fmt::Display for RoutingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::GatewayProxied => f.write_str("gateway-proxied"),
        }
    }
}
