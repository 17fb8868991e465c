//! Identity service flavours

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The identity service that issued a configuration or a token
///
/// The flavour matters to audience validation: XSUAA tokens may carry the issuing client in a
/// dedicated `cid` claim and may only encode their audience through granted scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// XSUAA-style service, audiences may be derived from scopes
    Xsuaa,
    /// Identity Authentication service, audiences are always explicit
    Ias,
}

impl Service {
    /// Lowercase name used in configuration files and on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xsuaa => "xsuaa",
            Self::Ias => "ias",
        }
    }

    /// Whether tokens of this service may encode their audience only through scopes
    pub const fn derives_audience_from_scopes(self) -> bool {
        matches!(self, Self::Xsuaa)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xsuaa" => Ok(Self::Xsuaa),
            "ias" | "identity" => Ok(Self::Ias),
            other => Err(ConfigError::InvalidField {
                field: "service",
                reason: format!("unknown identity service '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("XSUAA".parse::<Service>().unwrap(), Service::Xsuaa);
        assert_eq!(" ias ".parse::<Service>().unwrap(), Service::Ias);
        assert_eq!("identity".parse::<Service>().unwrap(), Service::Ias);
    }

    #[test]
    fn test_parse_unknown_service() {
        let err = "keycloak".parse::<Service>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { field: "service", .. }));
    }

    #[test]
    fn test_display_matches_serde_name() {
        for service in [Service::Xsuaa, Service::Ias] {
            let json = serde_json::to_string(&service).unwrap();
            assert_eq!(json, format!("\"{service}\""));
        }
    }

    #[test]
    fn test_only_xsuaa_derives_audience_from_scopes() {
        assert!(Service::Xsuaa.derives_audience_from_scopes());
        assert!(!Service::Ias.derives_audience_from_scopes());
    }
}
