//! Batch output rendering.
//!
//! The processed batch is wrapped in a versioned envelope so consumers
//! can detect incompatible producers. Rendering is deterministic: the
//! same batch always serializes to the same bytes, which callers rely on
//! for caching.

use crate::metrics::summary::{summarize, BatchSummary};
use crate::model::processed::ProcessedIssue;
use fl_common::{Error, OutputFormat, Result, SCHEMA_VERSION};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

/// Versioned wrapper around one processed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchEnvelope {
    /// Output schema version, see `fl_common::schema`.
    pub schema_version: String,

    pub issue_count: usize,

    pub issues: Vec<ProcessedIssue>,

    /// Batch KPI rollup.
    pub summary: BatchSummary,
}

impl BatchEnvelope {
    pub fn new(issues: Vec<ProcessedIssue>) -> Self {
        let summary = summarize(&issues);
        BatchEnvelope {
            schema_version: SCHEMA_VERSION.to_string(),
            issue_count: issues.len(),
            issues,
            summary,
        }
    }
}

/// Render an envelope in the requested output format.
pub fn render(envelope: &BatchEnvelope, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(envelope)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(envelope)?),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for issue in &envelope.issues {
                out.push_str(&serde_json::to_string(issue)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Summary => Ok(serde_json::to_string_pretty(&envelope.summary)?),
    }
}

/// JSON Schema of the batch envelope, for consumers generating bindings.
pub fn output_schema() -> Result<String> {
    let schema = schema_for!(BatchEnvelope);
    serde_json::to_string_pretty(&schema).map_err(|e| Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::metrics::aggregate::process_batch;
    use crate::model::input::IssueInput;

    fn envelope() -> BatchEnvelope {
        let issues = vec![IssueInput {
            id: "iss-1".into(),
            ..Default::default()
        }];
        BatchEnvelope::new(process_batch(&issues, &WorkflowConfig::default()))
    }

    #[test]
    fn test_envelope_carries_schema_version() {
        let env = envelope();
        assert_eq!(env.schema_version, SCHEMA_VERSION);
        assert_eq!(env.issue_count, 1);
        assert_eq!(env.summary.total_issues, 1);
    }

    #[test]
    fn test_render_json_round_trips() {
        let env = envelope();
        let json = render(&env, OutputFormat::Json).unwrap();
        let back: BatchEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn test_render_jsonl_one_line_per_issue() {
        let env = envelope();
        let jsonl = render(&env, OutputFormat::Jsonl).unwrap();
        assert_eq!(jsonl.lines().count(), 1);
        let issue: ProcessedIssue = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert_eq!(issue.issue_id, "iss-1");
    }

    #[test]
    fn test_render_deterministic() {
        let env = envelope();
        assert_eq!(
            render(&env, OutputFormat::Json).unwrap(),
            render(&env, OutputFormat::Json).unwrap()
        );
    }

    #[test]
    fn test_output_schema_is_json() {
        let schema = output_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert!(value.get("$schema").is_some() || value.get("title").is_some());
    }
}
