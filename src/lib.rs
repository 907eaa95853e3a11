//! # feature-flag-bundle
//!
//! Allow-list feature flags resolved from HTTP request data.
//!
//! A flag is enabled for a request when a value extracted from that request
//! matches one of the values configured for the flag. Two sources are
//! provided:
//!
//! - **cookie**: the cookie named after the flag (optionally prefixed)
//! - **userAgent**: the `User-Agent` header
//!
//! Both share one evaluation routine, [`MatchingProvider`], and differ only in
//! their [`ValueExtractor`]. Evaluation never fails: unknown flags, a missing
//! request and missing request values all mean "disabled". Only loading the
//! configuration can fail, and it fails fast.
//!
//! ## Example
//!
//! ```
//! use feature_flag_bundle::{FeatureFlagBundle, RequestContext, ValueProvider};
//! use http::header::{HeaderValue, COOKIE};
//!
//! let bundle = FeatureFlagBundle::from_yaml_str(
//!     r#"
//! providers:
//!   cookie:
//!     values:
//!       betaUI: ["on"]
//! "#,
//! )
//! .unwrap();
//!
//! let ctx = RequestContext::new().with_header(COOKIE, HeaderValue::from_static("betaUI=on"));
//! assert!(bundle.cookie().is_enabled("betaUI", Some(&ctx)));
//!
//! let ctx = RequestContext::new().with_header(COOKIE, HeaderValue::from_static("betaUI=off"));
//! assert!(!bundle.cookie().is_enabled("betaUI", Some(&ctx)));
//! ```

pub mod bundle;
pub mod context;
pub mod error;
pub mod matching;
pub mod model;
pub mod provider;
pub mod validation;

pub use bundle::FeatureFlagBundle;
pub use context::RequestContext;
pub use error::{ConfigError, ConfigErrorKind};
pub use matching::MatchPolicy;
pub use model::{AllowedValues, BundleConfig, ProviderConfig, ValidationMode};
pub use provider::{
    CookieExtractor, CookieValueProvider, MatchingProvider, UserAgentExtractor,
    UserAgentValueProvider, ValueExtractor, ValueProvider,
};
