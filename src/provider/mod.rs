//! Value providers.
//!
//! A provider answers "is flag F enabled for this request?" by extracting a
//! single value from the request and matching it against the allow-list
//! configured for F. The matching logic lives once in [`MatchingProvider`];
//! sources differ only in their [`ValueExtractor`].

mod cookie;
mod user_agent;

pub use cookie::{CookieExtractor, CookieValueProvider};
pub use user_agent::{UserAgentExtractor, UserAgentValueProvider};

use crate::context::RequestContext;
use crate::matching::MatchPolicy;
use crate::model::{ProviderConfig, ProviderSection};

/// Reads the value a flag is compared against from one request source.
pub trait ValueExtractor: Send + Sync {
    /// Name of the source, used as the provider name.
    fn source(&self) -> &'static str;

    /// Extracts the current value for `flag`, or `None` when the source has no value.
    fn extract<'c>(&self, flag: &str, ctx: &'c RequestContext) -> Option<&'c str>;
}

/// Capability shared by every provider.
pub trait ValueProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns whether `flag` is enabled for the request bound to `ctx`.
    ///
    /// Unknown flags, a missing context and missing request values all
    /// resolve to `false`. This never fails.
    fn is_enabled(&self, flag: &str, ctx: Option<&RequestContext>) -> bool;
}

/// A provider that matches an extracted value against per-flag allow-lists.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::model::{AllowedValues, ProviderConfig};
/// use feature_flag_bundle::{CookieValueProvider, RequestContext, ValueProvider};
///
/// let mut values = ProviderConfig::new();
/// values.insert("betaUI", AllowedValues::new(["on"]).unwrap());
/// let provider = CookieValueProvider::new(values);
///
/// let ctx = RequestContext::new().with_cookie("betaUI", "on");
/// assert!(provider.is_enabled("betaUI", Some(&ctx)));
/// assert!(!provider.is_enabled("betaUI", None));
/// assert!(!provider.is_enabled("unknown", Some(&ctx)));
/// ```
#[derive(Debug, Clone)]
pub struct MatchingProvider<E> {
    config: ProviderConfig,
    policy: MatchPolicy,
    extractor: E,
}

impl<E: ValueExtractor> MatchingProvider<E> {
    /// Creates a provider using exact matching.
    pub fn with_extractor(config: ProviderConfig, extractor: E) -> Self {
        Self {
            config,
            policy: MatchPolicy::Exact,
            extractor,
        }
    }

    /// Replaces the match policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub(crate) fn from_section_with(section: ProviderSection, extractor: E) -> Self {
        Self::with_extractor(section.values, extractor).with_policy(section.match_policy)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}

impl<E: ValueExtractor> ValueProvider for MatchingProvider<E> {
    fn name(&self) -> &str {
        self.extractor.source()
    }

    fn is_enabled(&self, flag: &str, ctx: Option<&RequestContext>) -> bool {
        let Some(allowed) = self.config.get(flag) else {
            tracing::debug!(provider = self.name(), flag, "flag not configured");
            return false;
        };

        let Some(ctx) = ctx else {
            tracing::debug!(provider = self.name(), flag, "no request context");
            return false;
        };

        let Some(value) = self.extractor.extract(flag, ctx) else {
            tracing::debug!(provider = self.name(), flag, "no value in request");
            return false;
        };

        let enabled = self.policy.matches_any(value, allowed);
        tracing::trace!(provider = self.name(), flag, value, enabled, "flag evaluated");
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AllowedValues;

    /// Extractor returning a fixed value, regardless of the request.
    struct Fixed(Option<&'static str>);

    impl ValueExtractor for Fixed {
        fn source(&self) -> &'static str {
            "fixed"
        }

        fn extract<'c>(&self, _flag: &str, _ctx: &'c RequestContext) -> Option<&'c str> {
            self.0
        }
    }

    fn provider(extracted: Option<&'static str>) -> MatchingProvider<Fixed> {
        let mut config = ProviderConfig::new();
        config.insert("flag", AllowedValues::new(["a", "b"]).unwrap());
        MatchingProvider::with_extractor(config, Fixed(extracted))
    }

    #[test]
    fn test_member_values_enable_flag() {
        let ctx = RequestContext::new();
        assert!(provider(Some("a")).is_enabled("flag", Some(&ctx)));
        assert!(provider(Some("b")).is_enabled("flag", Some(&ctx)));
    }

    #[test]
    fn test_other_values_disable_flag() {
        let ctx = RequestContext::new();
        for value in ["c", "A", "", "ab"] {
            assert!(!provider(Some(value)).is_enabled("flag", Some(&ctx)));
        }
        assert!(!provider(None).is_enabled("flag", Some(&ctx)));
    }

    #[test]
    fn test_unknown_flag_is_disabled() {
        let ctx = RequestContext::new();
        assert!(!provider(Some("a")).is_enabled("other", Some(&ctx)));
        assert!(!provider(Some("a")).is_enabled("", Some(&ctx)));
    }

    #[test]
    fn test_missing_context_is_disabled() {
        assert!(!provider(Some("a")).is_enabled("flag", None));
    }

    #[test]
    fn test_policy_is_applied() {
        let ctx = RequestContext::new();
        let provider = provider(Some("a-suffix")).with_policy(MatchPolicy::Prefix);
        assert_eq!(provider.policy(), MatchPolicy::Prefix);
        assert!(provider.is_enabled("flag", Some(&ctx)));
    }

    #[test]
    fn test_provider_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CookieValueProvider>();
        assert_send_sync::<UserAgentValueProvider>();
        assert_send_sync::<Box<dyn ValueProvider>>();
    }
}
