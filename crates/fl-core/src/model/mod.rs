//! Input and output records for the metrics engine.

pub mod input;
pub mod processed;
