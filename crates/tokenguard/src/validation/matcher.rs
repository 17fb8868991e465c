//! Audience matchers
//!
//! The [`AudienceValidator`](super::AudienceValidator) runs its matchers in order and accepts
//! the token on the first hit. The default chain is [`DefaultMatcher`] followed by
//! [`BrokerCloneMatcher`].

use std::fmt;

use super::TrustedClientIds;

/// Marker embedded in the client id of broker-provisioned clones
pub const BROKER_CLONE_MARKER: &str = "!b";

/// Separator between the tenant namespace and the client id in clone audiences
pub const TENANT_SEPARATOR: char = '|';

/// One matching strategy between token audiences and trusted client ids
///
/// Implementations must be pure: the same inputs always yield the same answer.
pub trait AudienceMatcher: fmt::Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Return the trusted client id the audiences match, if any
    fn find_match<'a>(
        &self,
        audiences: &[String],
        client_ids: &'a TrustedClientIds,
    ) -> Option<&'a str>;
}

/// Accepts when an audience equals a trusted client id
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl AudienceMatcher for DefaultMatcher {
    fn name(&self) -> &'static str {
        "default"
    }

    fn find_match<'a>(
        &self,
        audiences: &[String],
        client_ids: &'a TrustedClientIds,
    ) -> Option<&'a str> {
        client_ids
            .iter()
            .find(|client_id| audiences.iter().any(|audience| audience == client_id))
    }
}

/// Accepts `<tenant>|<client id>` audiences for broker-cloned client ids
///
/// Only trusted ids containing [`BROKER_CLONE_MARKER`] take part.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokerCloneMatcher;

impl AudienceMatcher for BrokerCloneMatcher {
    fn name(&self) -> &'static str {
        "broker-clone"
    }

    fn find_match<'a>(
        &self,
        audiences: &[String],
        client_ids: &'a TrustedClientIds,
    ) -> Option<&'a str> {
        client_ids
            .iter()
            .filter(|client_id| client_id.contains(BROKER_CLONE_MARKER))
            .find(|client_id| {
                audiences
                    .iter()
                    .any(|audience| is_clone_audience_of(audience, client_id))
            })
    }
}

/// `audience` ends with `"|" + client_id`
fn is_clone_audience_of(audience: &str, client_id: &str) -> bool {
    audience
        .strip_suffix(client_id)
        .is_some_and(|namespace| namespace.ends_with(TENANT_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trusted(ids: &[&str]) -> TrustedClientIds {
        let mut client_ids = TrustedClientIds::new();
        for id in ids {
            client_ids.insert(*id).unwrap();
        }
        client_ids
    }

    fn audiences(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_default_matcher_requires_exact_value() {
        let ids = trusted(&["app1", "app2"]);

        assert_eq!(
            DefaultMatcher.find_match(&audiences(&["other", "app2"]), &ids),
            Some("app2")
        );
        assert_eq!(DefaultMatcher.find_match(&audiences(&["APP1", "app"]), &ids), None);
        assert_eq!(DefaultMatcher.find_match(&[], &ids), None);
    }

    #[test]
    fn test_default_matcher_prefers_registration_order() {
        let ids = trusted(&["app1", "app2"]);
        assert_eq!(
            DefaultMatcher.find_match(&audiences(&["app2", "app1"]), &ids),
            Some("app1")
        );
    }

    #[test]
    fn test_clone_audience_suffix() {
        assert!(is_clone_audience_of("tenant42|sb-clone!b1234", "sb-clone!b1234"));
        assert!(is_clone_audience_of("|sb-clone!b1234", "sb-clone!b1234"));
        assert!(is_clone_audience_of("a|b|sb-clone!b1234", "sb-clone!b1234"));
        assert!(!is_clone_audience_of("sb-clone!b1234", "sb-clone!b1234"));
        assert!(!is_clone_audience_of("tenant42|xsb-clone!b1234", "sb-clone!b1234"));
        assert!(!is_clone_audience_of("tenant42|sb-clone!b1234|x", "sb-clone!b1234"));
    }

    #[test]
    fn test_broker_clone_matcher() {
        let ids = trusted(&["app1", "sb-clone!b1234"]);

        assert_eq!(
            BrokerCloneMatcher.find_match(&audiences(&["tenant42|sb-clone!b1234"]), &ids),
            Some("sb-clone!b1234")
        );
        assert_eq!(
            BrokerCloneMatcher.find_match(&audiences(&["tenant42|other-client"]), &ids),
            None
        );
    }

    #[test]
    fn test_broker_clone_matcher_ignores_unmarked_ids() {
        let ids = trusted(&["app1"]);
        assert_eq!(
            BrokerCloneMatcher.find_match(&audiences(&["tenant42|app1"]), &ids),
            None
        );
    }
}
