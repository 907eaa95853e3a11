//! Provider reading flag values from the `User-Agent` header.

use super::{MatchingProvider, ValueExtractor};
use crate::context::RequestContext;
use crate::model::{ProviderConfig, ProviderSection};

/// Reads the request's `User-Agent` header; every flag sees the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserAgentExtractor;

impl ValueExtractor for UserAgentExtractor {
    fn source(&self) -> &'static str {
        "userAgent"
    }

    fn extract<'c>(&self, _flag: &str, ctx: &'c RequestContext) -> Option<&'c str> {
        ctx.user_agent()
    }
}

/// Flag provider backed by the `User-Agent` header.
pub type UserAgentValueProvider = MatchingProvider<UserAgentExtractor>;

impl MatchingProvider<UserAgentExtractor> {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_extractor(config, UserAgentExtractor)
    }

    pub fn from_section(section: ProviderSection) -> Self {
        Self::from_section_with(section, UserAgentExtractor)
    }
}
