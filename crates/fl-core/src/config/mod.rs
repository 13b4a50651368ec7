//! Workflow configuration: state-name map and QA-feedback label needle.
//!
//! Defaults match a stock Linear-style workspace ("Todo", "In Progress",
//! "In Review", "Ready to QA", "In QA", "Done", label substring
//! "qa feedback"). Teams with renamed states override them via a JSON
//! config file.
//!
//! Resolution order: CLI argument → `FL_CONFIG_DIR` → XDG config directory
//! → built-in defaults.

use fl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config directory.
const ENV_CONFIG_DIR: &str = "FL_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILE: &str = "flowlens.json";

/// Workflow state names recognized by the transition extractor and
/// feedback-cycle detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateNames {
    pub todo: String,
    pub in_progress: String,
    pub in_review: String,
    pub ready_to_qa: String,
    pub in_qa: String,
    pub done: String,
}

impl Default for StateNames {
    fn default() -> Self {
        StateNames {
            todo: "Todo".into(),
            in_progress: "In Progress".into(),
            in_review: "In Review".into(),
            ready_to_qa: "Ready to QA".into(),
            in_qa: "In QA".into(),
            done: "Done".into(),
        }
    }
}

impl StateNames {
    fn all(&self) -> [(&'static str, &str); 6] {
        [
            ("todo", &self.todo),
            ("in_progress", &self.in_progress),
            ("in_review", &self.in_review),
            ("ready_to_qa", &self.ready_to_qa),
            ("in_qa", &self.in_qa),
            ("done", &self.done),
        ]
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Recognized workflow state names.
    pub states: StateNames,

    /// Case-insensitive substring matched against label names to decide
    /// whether the feedback-cycle detector runs for an issue.
    pub qa_feedback_label: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            states: StateNames::default(),
            qa_feedback_label: "qa feedback".into(),
        }
    }
}

/// Where the effective configuration came from, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument(PathBuf),

    /// Found via the FL_CONFIG_DIR environment variable.
    Environment(PathBuf),

    /// Found in the XDG config directory.
    XdgConfig(PathBuf),

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument(p) => write!(f, "CLI argument ({})", p.display()),
            ConfigSource::Environment(p) => write!(f, "environment variable ({})", p.display()),
            ConfigSource::XdgConfig(p) => write!(f, "XDG config ({})", p.display()),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

impl WorkflowConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<WorkflowConfig> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: WorkflowConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidWorkflow(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective config: explicit path, else discovery, else
    /// defaults. Returns the config together with its source.
    pub fn resolve(cli_path: Option<&Path>) -> Result<(WorkflowConfig, ConfigSource)> {
        if let Some(path) = cli_path {
            return Ok((Self::load(path)?, ConfigSource::CliArgument(path.to_owned())));
        }

        if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
            let path = PathBuf::from(dir).join(CONFIG_FILE);
            if path.is_file() {
                return Ok((Self::load(&path)?, ConfigSource::Environment(path)));
            }
        }

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("flowlens").join(CONFIG_FILE);
            if path.is_file() {
                return Ok((Self::load(&path)?, ConfigSource::XdgConfig(path)));
            }
        }

        let config = WorkflowConfig::default();
        config.validate()?;
        Ok((config, ConfigSource::BuiltinDefault))
    }

    /// Semantic validation: no empty names, no duplicate state names,
    /// non-empty label needle.
    pub fn validate(&self) -> Result<()> {
        let names = self.states.all();

        for (field, value) in &names {
            if value.trim().is_empty() {
                return Err(Error::InvalidWorkflow(format!(
                    "state name '{}' must not be empty",
                    field
                )));
            }
        }

        for (i, (_, a)) in names.iter().enumerate() {
            for (_, b) in names.iter().skip(i + 1) {
                if a == b {
                    return Err(Error::InvalidWorkflow(format!(
                        "duplicate state name \"{}\"",
                        a
                    )));
                }
            }
        }

        if self.qa_feedback_label.trim().is_empty() {
            return Err(Error::InvalidWorkflow(
                "qa_feedback_label must not be empty".into(),
            ));
        }

        Ok(())
    }
}
