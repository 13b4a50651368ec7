//! Schema versioning for batch output.
//!
//! The processed-issue record is a stable contract for downstream
//! dashboards and caches. `SCHEMA_VERSION` is embedded in every batch
//! envelope so consumers can detect incompatible producers. Bump the
//! major component on any field removal or meaning change; additive
//! fields bump the minor component.

/// Current output schema version.
pub const SCHEMA_VERSION: &str = "1.0.0";
