//! Allow-lists of flag values and the per-provider flag mapping.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered list of unique, non-empty values for one feature flag.
///
/// Order follows the configuration document; a repeated value keeps its first
/// position. Matching against the list is exact and case-sensitive.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::model::AllowedValues;
///
/// let values = AllowedValues::new(["on", "beta", "on"]).unwrap();
/// assert_eq!(values.len(), 2);
/// assert!(values.contains("beta"));
/// assert!(!values.contains("ON"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedValues(Vec<String>);

impl AllowedValues {
    /// Builds an allow-list, rejecting empty strings.
    pub fn new<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            let value = value.into();
            if value.is_empty() {
                return Err(ConfigError::empty_value(format!("/{}", index)));
            }
            allowed.push(value);
        }
        Ok(allowed)
    }

    /// Appends a value unless it is already present. The caller guarantees it is non-empty.
    pub(crate) fn push(&mut self, value: String) {
        debug_assert!(!value.is_empty());
        if !self.0.contains(&value) {
            self.0.push(value);
        }
    }

    /// Returns `true` if `value` is one of the allowed values.
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|allowed| allowed == value)
    }

    /// Iterates over the allowed values in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for AllowedValues {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<String>::deserialize(deserializer)?;
        AllowedValues::new(values).map_err(|e| serde::de::Error::custom(e.message))
    }
}

/// Mapping of flag names to their allowed values, owned by a single provider.
///
/// Inserting a flag that already exists replaces its allow-list.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::model::{AllowedValues, ProviderConfig};
///
/// let mut config = ProviderConfig::new();
/// config.insert("betaUI", AllowedValues::new(["on"]).unwrap());
/// config.insert("betaUI", AllowedValues::new(["yes"]).unwrap());
///
/// assert_eq!(config.len(), 1);
/// assert!(config.get("betaUI").unwrap().contains("yes"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderConfig {
    flags: BTreeMap<String, AllowedValues>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the allowed values of `flag`, returning the previous allow-list if any.
    pub fn insert(&mut self, flag: impl Into<String>, values: AllowedValues) -> Option<AllowedValues> {
        self.flags.insert(flag.into(), values)
    }

    /// Looks up the allowed values of `flag`.
    pub fn get(&self, flag: &str) -> Option<&AllowedValues> {
        self.flags.get(flag)
    }

    /// Iterates over the configured flag names in sorted order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AllowedValues)> for ProviderConfig {
    fn from_iter<T: IntoIterator<Item = (K, AllowedValues)>>(iter: T) -> Self {
        let mut config = ProviderConfig::new();
        for (flag, values) in iter {
            config.insert(flag, values);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorKind;

    #[test]
    fn test_allowed_values_reject_empty_string() {
        let err = AllowedValues::new(["on", ""]).unwrap_err();
        assert_eq!(err.error_type, ConfigErrorKind::EmptyValue);
        assert_eq!(err.path, "/1");
    }

    #[test]
    fn test_allowed_values_keep_first_occurrence() {
        let values = AllowedValues::new(["b", "a", "b"]).unwrap();
        assert_eq!(values.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_allowed_values_whitespace_is_not_empty() {
        let values = AllowedValues::new([" "]).unwrap();
        assert!(values.contains(" "));
    }

    #[test]
    fn test_empty_allow_list_is_valid() {
        let values = AllowedValues::new(Vec::<String>::new()).unwrap();
        assert!(values.is_empty());
        assert!(!values.contains(""));
    }

    #[test]
    fn test_provider_config_from_iter_overwrites() {
        let config: ProviderConfig = vec![
            ("flag", AllowedValues::new(["a"]).unwrap()),
            ("flag", AllowedValues::new(["b"]).unwrap()),
        ]
        .into_iter()
        .collect();

        assert_eq!(config.len(), 1);
        let values = config.get("flag").unwrap();
        assert!(values.contains("b"));
        assert!(!values.contains("a"));
    }

    #[test]
    fn test_provider_config_deserialize_rejects_empty_value() {
        let result: std::result::Result<ProviderConfig, _> =
            serde_json::from_str(r#"{"betaUI": ["on", ""]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_config_serializes_as_map() {
        let config: ProviderConfig = vec![("betaUI", AllowedValues::new(["on"]).unwrap())]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"betaUI": ["on"]}));
    }
}
