//! Provider reading flag values from request cookies.

use super::{MatchingProvider, ValueExtractor};
use crate::context::RequestContext;
use crate::model::{CookieSection, ProviderConfig};

/// Reads the cookie named after the flag, optionally behind a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieExtractor {
    prefix: String,
}

impl CookieExtractor {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The cookie name consulted for `flag`.
    pub fn cookie_name(&self, flag: &str) -> String {
        format!("{}{}", self.prefix, flag)
    }
}

impl ValueExtractor for CookieExtractor {
    fn source(&self) -> &'static str {
        "cookie"
    }

    fn extract<'c>(&self, flag: &str, ctx: &'c RequestContext) -> Option<&'c str> {
        if self.prefix.is_empty() {
            ctx.cookie(flag)
        } else {
            ctx.cookie(&self.cookie_name(flag))
        }
    }
}

/// Flag provider backed by request cookies.
pub type CookieValueProvider = MatchingProvider<CookieExtractor>;

impl MatchingProvider<CookieExtractor> {
    /// Creates a cookie provider where each flag reads the cookie of the same name.
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_extractor(config, CookieExtractor::default())
    }

    /// Prepends `prefix` to flag names when looking up cookies.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.extractor = CookieExtractor::new(prefix);
        self
    }

    pub fn from_section(section: CookieSection) -> Self {
        Self::from_section_with(section.section, CookieExtractor::new(section.prefix))
    }
}
