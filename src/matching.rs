//! Comparison of an extracted request value against an allow-list.
//!
//! All policies are case-sensitive.

use crate::model::AllowedValues;
use serde::{Deserialize, Serialize};

/// How an extracted value is compared with each allowed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The extracted value equals an allowed value
    #[default]
    Exact,
    /// The extracted value starts with an allowed value
    Prefix,
    /// The extracted value ends with an allowed value
    Suffix,
}

impl MatchPolicy {
    /// Compares a single allowed value with the extracted one.
    ///
    /// # Example
    /// ```
    /// use feature_flag_bundle::MatchPolicy;
    ///
    /// assert!(MatchPolicy::Prefix.matches("OldBrowser/1.0 (X11)", "OldBrowser/"));
    /// assert!(!MatchPolicy::Exact.matches("OldBrowser/1.0 (X11)", "OldBrowser/"));
    /// ```
    pub fn matches(self, extracted: &str, allowed: &str) -> bool {
        match self {
            MatchPolicy::Exact => extracted == allowed,
            MatchPolicy::Prefix => extracted.starts_with(allowed),
            MatchPolicy::Suffix => extracted.ends_with(allowed),
        }
    }

    /// Returns `true` if `extracted` matches any of the allowed values.
    pub fn matches_any(self, extracted: &str, allowed: &AllowedValues) -> bool {
        match self {
            MatchPolicy::Exact => allowed.contains(extracted),
            _ => allowed.iter().any(|value| self.matches(extracted, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(values: &[&str]) -> AllowedValues {
        AllowedValues::new(values.iter().copied()).unwrap()
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let allowed = allow(&["a", "b"]);
        assert!(MatchPolicy::Exact.matches_any("a", &allowed));
        assert!(MatchPolicy::Exact.matches_any("b", &allowed));
        assert!(!MatchPolicy::Exact.matches_any("A", &allowed));
        assert!(!MatchPolicy::Exact.matches_any("ab", &allowed));
        assert!(!MatchPolicy::Exact.matches_any("", &allowed));
    }

    #[test]
    fn test_prefix() {
        let allowed = allow(&["Mozilla/4", "OldBrowser/"]);
        assert!(MatchPolicy::Prefix.matches_any("OldBrowser/1.0", &allowed));
        assert!(MatchPolicy::Prefix.matches_any("Mozilla/4.0 (compatible)", &allowed));
        assert!(!MatchPolicy::Prefix.matches_any("Mozilla/5.0", &allowed));
        assert!(!MatchPolicy::Prefix.matches_any("oldbrowser/1.0", &allowed));
    }

    #[test]
    fn test_suffix() {
        let allowed = allow(&["Edge/18"]);
        assert!(MatchPolicy::Suffix.matches_any("Mozilla/5.0 Edge/18", &allowed));
        assert!(!MatchPolicy::Suffix.matches_any("Edge/18 Mozilla/5.0", &allowed));
    }

    #[test]
    fn test_empty_allow_list_never_matches() {
        let allowed = allow(&[]);
        for policy in [MatchPolicy::Exact, MatchPolicy::Prefix, MatchPolicy::Suffix] {
            assert!(!policy.matches_any("anything", &allowed));
        }
    }

    #[test]
    fn test_default_is_exact() {
        assert_eq!(MatchPolicy::default(), MatchPolicy::Exact);
        let policy: MatchPolicy = serde_json::from_str(r#""suffix""#).unwrap();
        assert_eq!(policy, MatchPolicy::Suffix);
    }
}
