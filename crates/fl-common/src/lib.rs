//! FlowLens common types and errors.
//!
//! This crate provides foundational types shared across fl-core modules:
//! - Common error types with stable codes
//! - Output format specifications
//! - Schema versioning for batch output

pub mod error;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
