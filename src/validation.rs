//! JSON Schema validation for bundle configurations.
//!
//! The configuration document is checked against an embedded schema before it
//! is normalized into provider configurations. The schema only covers
//! structure; value coercion and the non-empty rule are applied afterwards by
//! [`crate::model::BundleConfig::from_value`].

use boon::{Compiler, SchemaIndex, Schemas};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;

/// The embedded JSON Schema for the configuration document.
const CONFIG_SCHEMA: &str = include_str!("../schemas/config.json");

/// Resource URL the schema is registered under.
const CONFIG_SCHEMA_URL: &str = "http://example.com/feature-flag-bundle/config.json";

/// Fallback error JSON when serialization fails.
const VALIDATION_RESULT_FALLBACK: &str =
    r#"{"valid":false,"errors":[{"path":"","message":"Failed to serialize validation result"}]}"#;

/// Cached compiled schema data for boon
struct CompiledSchema {
    schemas: Schemas,
    schema_index: SchemaIndex,
}

thread_local! {
    /// Compiled once per thread and reused by every subsequent load.
    static COMPILED_SCHEMA: RefCell<Option<CompiledSchema>> = const { RefCell::new(None) };
}

/// Represents a validation error with location and message information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The JSON pointer where the error occurred (e.g., "/providers/cookie")
    pub path: String,
    /// A human-readable description of the validation error
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Represents the result of schema validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the validation succeeded
    pub valid: bool,
    /// List of validation errors (empty if valid)
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }

    /// Converts the validation result to a JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| VALIDATION_RESULT_FALLBACK.to_string())
    }
}

fn compile_schema() -> Result<CompiledSchema, String> {
    let schema_value: Value = serde_json::from_str(CONFIG_SCHEMA)
        .map_err(|e| format!("Failed to parse configuration schema: {}", e))?;

    let mut schemas = Schemas::new();
    let mut compiler = Compiler::new();
    compiler
        .add_resource(CONFIG_SCHEMA_URL, schema_value)
        .map_err(|e| format!("Failed to add configuration schema resource: {}", e))?;
    let schema_index = compiler
        .compile(CONFIG_SCHEMA_URL, &mut schemas)
        .map_err(|e| format!("Failed to compile configuration schema: {}", e))?;

    Ok(CompiledSchema {
        schemas,
        schema_index,
    })
}

/// Collects the error and its nested causes, depth first.
fn collect_errors(error: &boon::ValidationError<'_, '_>, errors: &mut Vec<ValidationError>) {
    errors.push(ValidationError::new(
        error.instance_location.to_string(),
        error.kind.to_string(),
    ));
    for cause in &error.causes {
        collect_errors(cause, errors);
    }
}

/// Validates a parsed configuration document against the bundle schema.
///
/// # Returns
///
/// Returns `Ok(())` if validation succeeds, or `Err(ValidationResult)` with
/// every reported violation if it fails.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::validation::validate_config;
/// use serde_json::json;
///
/// let config = json!({
///     "providers": {
///         "cookie": {"values": {"betaUI": ["on"]}}
///     }
/// });
/// assert!(validate_config(&config).is_ok());
///
/// let unknown_key = json!({"providers": {"header": {}}});
/// assert!(validate_config(&unknown_key).is_err());
/// ```
pub fn validate_config(config: &Value) -> Result<(), ValidationResult> {
    COMPILED_SCHEMA.with(|cell| {
        let mut cached = cell.borrow_mut();
        if cached.is_none() {
            let compiled = compile_schema()
                .map_err(|e| ValidationResult::failure(vec![ValidationError::new("", e)]))?;
            *cached = Some(compiled);
        }
        let Some(compiled) = cached.as_ref() else {
            return Err(ValidationResult::failure(vec![ValidationError::new(
                "",
                "Schema not initialized",
            )]));
        };

        match compiled.schemas.validate(config, compiled.schema_index) {
            Ok(()) => Ok(()),
            Err(e) => {
                let mut errors = Vec::new();
                collect_errors(&e, &mut errors);
                Err(ValidationResult::failure(errors))
            }
        }
    })
}
