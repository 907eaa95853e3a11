//! Host integration for the value providers.
//!
//! A [`FeatureFlagBundle`] is built once at start-up from the bundle
//! configuration and handed to request handlers (usually behind an `Arc`).
//! It owns one provider per source and never changes afterwards.

use crate::context::RequestContext;
use crate::error::Result;
use crate::model::{BundleConfig, ValidationMode};
use crate::provider::{CookieValueProvider, UserAgentValueProvider, ValueProvider};
use std::path::Path;

/// The configured set of value providers.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::{FeatureFlagBundle, RequestContext};
/// use http::header::{HeaderValue, USER_AGENT};
///
/// let bundle = FeatureFlagBundle::from_json_str(r#"{
///     "providers": {
///         "cookie": {"values": {"betaUI": ["on"]}},
///         "userAgent": {"values": {"legacyClient": ["OldBrowser/1.0"]}}
///     }
/// }"#).unwrap();
///
/// let ctx = RequestContext::new()
///     .with_header(USER_AGENT, HeaderValue::from_static("OldBrowser/1.0"));
///
/// assert!(bundle.is_enabled("userAgent", "legacyClient", Some(&ctx)));
/// assert!(!bundle.is_enabled("cookie", "betaUI", Some(&ctx)));
/// assert!(!bundle.is_enabled("header", "legacyClient", Some(&ctx)));
/// ```
#[derive(Debug, Clone)]
pub struct FeatureFlagBundle {
    cookie: CookieValueProvider,
    user_agent: UserAgentValueProvider,
}

impl FeatureFlagBundle {
    /// Builds the providers from a normalized configuration.
    pub fn new(config: BundleConfig) -> Self {
        let providers = config.providers;
        let cookie = CookieValueProvider::from_section(providers.cookie);
        let user_agent = UserAgentValueProvider::from_section(providers.user_agent);

        tracing::info!(
            cookie_flags = cookie.config().len(),
            user_agent_flags = user_agent.config().len(),
            "feature flag providers configured"
        );

        Self { cookie, user_agent }
    }

    /// Loads a JSON configuration document in strict mode.
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        BundleConfig::from_json_str(json_str).map(Self::new)
    }

    /// Loads a YAML configuration document in strict mode.
    pub fn from_yaml_str(yaml_str: &str) -> Result<Self> {
        BundleConfig::from_yaml_str(yaml_str).map(Self::new)
    }

    /// Loads a configuration file; see [`BundleConfig::from_path`].
    pub fn from_path(path: impl AsRef<Path>, mode: ValidationMode) -> Result<Self> {
        BundleConfig::from_path(path, mode).map(Self::new)
    }

    pub fn cookie(&self) -> &CookieValueProvider {
        &self.cookie
    }

    pub fn user_agent(&self) -> &UserAgentValueProvider {
        &self.user_agent
    }

    /// Looks up a provider by name (`"cookie"` or `"userAgent"`).
    pub fn provider(&self, name: &str) -> Option<&dyn ValueProvider> {
        self.providers().find(|provider| provider.name() == name)
    }

    /// Iterates over all providers.
    pub fn providers(&self) -> impl Iterator<Item = &dyn ValueProvider> {
        [
            &self.cookie as &dyn ValueProvider,
            &self.user_agent as &dyn ValueProvider,
        ]
        .into_iter()
    }

    /// Evaluates `flag` with the named provider; unknown providers yield `false`.
    pub fn is_enabled(&self, provider: &str, flag: &str, ctx: Option<&RequestContext>) -> bool {
        match self.provider(provider) {
            Some(provider) => provider.is_enabled(flag, ctx),
            None => {
                tracing::debug!(provider, flag, "unknown provider");
                false
            }
        }
    }
}

impl Default for FeatureFlagBundle {
    fn default() -> Self {
        Self::new(BundleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorKind;
    use http::header::{HeaderValue, COOKIE, USER_AGENT};
    use std::sync::Arc;

    const CONFIG: &str = r#"{
        "providers": {
            "cookie": {"values": {"betaUI": ["on"]}},
            "userAgent": {"values": {"legacyClient": ["OldBrowser/1.0"]}}
        }
    }"#;

    #[test]
    fn test_provider_lookup() {
        let bundle = FeatureFlagBundle::from_json_str(CONFIG).unwrap();
        assert_eq!(bundle.provider("cookie").map(|p| p.name()), Some("cookie"));
        assert_eq!(bundle.provider("userAgent").map(|p| p.name()), Some("userAgent"));
        assert!(bundle.provider("user_agent").is_none());

        let names: Vec<_> = bundle.providers().map(|p| p.name()).collect();
        assert_eq!(names, vec!["cookie", "userAgent"]);
    }

    #[test]
    fn test_providers_use_their_own_source() {
        let bundle = FeatureFlagBundle::from_json_str(CONFIG).unwrap();
        let ctx = RequestContext::new()
            .with_header(COOKIE, HeaderValue::from_static("betaUI=on"))
            .with_header(USER_AGENT, HeaderValue::from_static("NewBrowser/3.0"));

        assert!(bundle.cookie().is_enabled("betaUI", Some(&ctx)));
        assert!(!bundle.user_agent().is_enabled("legacyClient", Some(&ctx)));
        // Flags are scoped to the provider they are configured on.
        assert!(!bundle.user_agent().is_enabled("betaUI", Some(&ctx)));
    }

    #[test]
    fn test_no_context_never_enables() {
        let bundle = FeatureFlagBundle::from_json_str(CONFIG).unwrap();
        for provider in bundle.providers() {
            for flag in ["betaUI", "legacyClient", "unknown"] {
                assert!(!provider.is_enabled(flag, None));
            }
        }
    }

    #[test]
    fn test_default_bundle_has_no_flags() {
        let bundle = FeatureFlagBundle::default();
        assert!(bundle.cookie().config().is_empty());
        assert!(bundle.user_agent().config().is_empty());
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let err = FeatureFlagBundle::from_json_str(
            r#"{"providers": {"cookie": {"values": {"betaUI": [""]}}}}"#,
        )
        .unwrap_err();
        assert_eq!(err.error_type, ConfigErrorKind::EmptyValue);
    }

    #[test]
    fn test_shared_across_threads() {
        let bundle = Arc::new(FeatureFlagBundle::from_json_str(CONFIG).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let bundle = Arc::clone(&bundle);
                std::thread::spawn(move || {
                    let value = if i % 2 == 0 { "on" } else { "off" };
                    let ctx = RequestContext::new().with_cookie("betaUI", value);
                    bundle.is_enabled("cookie", "betaUI", Some(&ctx)) == (i % 2 == 0)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
