//! Configuration models for the feature flag bundle.
//!
//! [`BundleConfig`] is the normalized form of the host configuration document;
//! each provider receives its own [`ProviderConfig`] from it.

mod allowed_values;
mod bundle_config;

pub use allowed_values::{AllowedValues, ProviderConfig};
pub use bundle_config::{BundleConfig, CookieSection, ProviderSection, ProvidersConfig, ValidationMode};
