//! The bundle configuration document and its normalization.
//!
//! ```yaml
//! providers:
//!   cookie:
//!     prefix: ""
//!     match: exact
//!     values:
//!       betaUI: [on, beta]
//!   userAgent:
//!     match: prefix
//!     values:
//!       legacyClient: "OldBrowser/"
//! ```

use super::allowed_values::{AllowedValues, ProviderConfig};
use crate::error::{ConfigError, Result};
use crate::matching::MatchPolicy;
use crate::validation::validate_config;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Validation mode determines how schema violations are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Reject configurations that do not match the schema (default)
    #[default]
    Strict,
    /// Log schema violations and continue with normalization
    Permissive,
}

/// Flag values and match policy shared by every provider section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderSection {
    /// Flag name to allowed values
    pub values: ProviderConfig,
    /// How extracted values are compared with the allowed values
    #[serde(rename = "match")]
    pub match_policy: MatchPolicy,
}

/// Configuration of the cookie provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CookieSection {
    /// Prepended to a flag name to form the cookie name
    pub prefix: String,
    #[serde(flatten)]
    pub section: ProviderSection,
}

/// The `providers` node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersConfig {
    pub cookie: CookieSection,
    pub user_agent: ProviderSection,
}

/// The complete, normalized bundle configuration.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::model::BundleConfig;
///
/// let config = BundleConfig::from_yaml_str(
///     "providers:\n  cookie:\n    values:\n      betaUI: [\"on\"]\n",
/// )
/// .unwrap();
///
/// let allowed = config.providers.cookie.section.values.get("betaUI").unwrap();
/// assert!(allowed.contains("on"));
/// assert!(config.providers.user_agent.values.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BundleConfig {
    pub providers: ProvidersConfig,
}

/// Section fields other than `values`, which are normalized by hand.
#[derive(Debug, Default, Deserialize)]
struct RawSection {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default, rename = "match")]
    match_policy: MatchPolicy,
}

impl BundleConfig {
    /// Parses and normalizes a JSON configuration document in strict mode.
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        Self::from_json_str_with_mode(json_str, ValidationMode::Strict)
    }

    pub fn from_json_str_with_mode(json_str: &str, mode: ValidationMode) -> Result<Self> {
        let document: Value = serde_json::from_str(json_str)
            .map_err(|e| ConfigError::parse_error(format!("Failed to parse JSON: {}", e)))?;
        Self::from_value_with_mode(&document, mode)
    }

    /// Parses and normalizes a YAML configuration document in strict mode.
    pub fn from_yaml_str(yaml_str: &str) -> Result<Self> {
        Self::from_yaml_str_with_mode(yaml_str, ValidationMode::Strict)
    }

    pub fn from_yaml_str_with_mode(yaml_str: &str, mode: ValidationMode) -> Result<Self> {
        if yaml_str.trim().is_empty() {
            return Self::from_value_with_mode(&Value::Null, mode);
        }
        let document: Value = serde_yaml::from_str(yaml_str)
            .map_err(|e| ConfigError::parse_error(format!("Failed to parse YAML: {}", e)))?;
        Self::from_value_with_mode(&document, mode)
    }

    /// Reads a configuration file, choosing the format from its extension.
    ///
    /// `.json` files are parsed as JSON; `.yaml`, `.yml` and anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>, mode: ValidationMode) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::io_error(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => {
                Self::from_json_str_with_mode(&content, mode)
            }
            _ => Self::from_yaml_str_with_mode(&content, mode),
        }
    }

    /// Normalizes an already parsed document in strict mode.
    pub fn from_value(document: &Value) -> Result<Self> {
        Self::from_value_with_mode(document, ValidationMode::Strict)
    }

    /// Validates and normalizes an already parsed document.
    ///
    /// A `null` document (an empty YAML file) is treated as `{}`.
    pub fn from_value_with_mode(document: &Value, mode: ValidationMode) -> Result<Self> {
        let empty = Value::Object(Map::new());
        let document = if document.is_null() { &empty } else { document };

        if let Err(validation) = validate_config(document) {
            match mode {
                ValidationMode::Strict => {
                    // The innermost cause names the offending node most precisely.
                    let cause = validation.errors.last().cloned().unwrap_or_else(|| {
                        crate::validation::ValidationError::new("", "invalid configuration")
                    });
                    return Err(ConfigError::schema_error(cause.path, cause.message));
                }
                ValidationMode::Permissive => {
                    tracing::warn!(
                        errors = %validation.to_json_string(),
                        "configuration has validation errors"
                    );
                }
            }
        }

        let providers = match document.get("providers") {
            Some(Value::Object(providers)) => providers,
            Some(Value::Null) | None => return Ok(Self::default()),
            Some(_) => {
                return Err(ConfigError::schema_error(
                    "/providers",
                    "'providers' must be an object",
                ))
            }
        };

        let (cookie_raw, cookie) = parse_section(providers, "cookie")?;
        let (_, user_agent) = parse_section(providers, "userAgent")?;

        Ok(BundleConfig {
            providers: ProvidersConfig {
                cookie: CookieSection {
                    prefix: cookie_raw.prefix.unwrap_or_default(),
                    section: cookie,
                },
                user_agent,
            },
        })
    }
}

fn parse_section(providers: &Map<String, Value>, name: &str) -> Result<(RawSection, ProviderSection)> {
    let path = format!("/providers/{}", name);
    let section = match providers.get(name) {
        Some(Value::Object(section)) => section,
        Some(Value::Null) | None => return Ok((RawSection::default(), ProviderSection::default())),
        Some(_) => return Err(ConfigError::schema_error(path, "section must be an object")),
    };

    let mut settings = section.clone();
    settings.remove("values");
    let raw: RawSection = serde_json::from_value(Value::Object(settings))
        .map_err(|e| ConfigError::schema_error(path.clone(), e.to_string()))?;

    let values = match section.get("values") {
        Some(Value::Object(values)) => normalize_values(values, &format!("{}/values", path))?,
        Some(Value::Null) | None => ProviderConfig::new(),
        Some(_) => {
            return Err(ConfigError::schema_error(
                format!("{}/values", path),
                "'values' must be a mapping of flag names to allowed values",
            ))
        }
    };

    let match_policy = raw.match_policy;
    Ok((
        raw,
        ProviderSection {
            values,
            match_policy,
        },
    ))
}

/// Casts each entry to a list and coerces every element to a non-empty string.
fn normalize_values(values: &Map<String, Value>, path: &str) -> Result<ProviderConfig> {
    let mut config = ProviderConfig::new();
    for (flag, entry) in values {
        let flag_path = format!("{}/{}", path, escape_pointer(flag));
        let elements = match entry {
            Value::Array(elements) => elements.as_slice(),
            scalar => std::slice::from_ref(scalar),
        };

        let mut allowed = AllowedValues::default();
        for (index, element) in elements.iter().enumerate() {
            let element_path = format!("{}/{}", flag_path, index);
            let value = coerce_to_string(element, &element_path)?;
            if value.is_empty() {
                return Err(ConfigError::empty_value(element_path));
            }
            allowed.push(value);
        }
        config.insert(flag.clone(), allowed);
    }
    Ok(config)
}

/// String coercion for scalar allowed values.
///
/// Booleans follow the usual `"1"` / `""` convention, so `false` and `null`
/// end up empty and are rejected by the caller.
fn coerce_to_string(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) | Value::Null => Ok(String::new()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Ok(n.to_string());
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                    Ok(format!("{}", f as i64))
                }
                Some(f) => Ok(f.to_string()),
                None => Ok(n.to_string()),
            }
        }
        Value::Array(_) | Value::Object(_) => Err(ConfigError::invalid_value(
            path,
            "allowed values must be scalars",
        )),
    }
}

/// Escapes a flag name for use as a JSON pointer segment.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
