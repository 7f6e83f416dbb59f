//! Diagnostics produced by validation, and the error types of the
//! integration collaborators (store, engine, editing, settings).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// The graph shape itself is invalid.
    Structural,
    /// A node's configuration violates its type's rules.
    Configuration,
    /// Unparseable input or a failed external collaborator.
    Integration,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Structural => write!(f, "Structural"),
            Category::Configuration => write!(f, "Configuration"),
            Category::Integration => write!(f, "Integration"),
        }
    }
}

/// One violation found in a workflow. There is no severity: any diagnostic
/// blocks execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub category: Category,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}

impl Diagnostic {
    pub fn structural(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Diagnostic {
            code: code.into(),
            category: Category::Structural,
            message: message.into(),
            node_id,
        }
    }

    pub fn configuration(code: &str, message: impl Into<String>, node_id: &str) -> Self {
        Diagnostic {
            code: code.into(),
            category: Category::Configuration,
            message: message.into(),
            node_id: Some(node_id.to_string()),
        }
    }

    pub fn integration(code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            code: code.into(),
            category: Category::Integration,
            message: message.into(),
            node_id: None,
        }
    }
}

/// Render diagnostics as the plain string list shown to the user.
pub fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write workflow store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize workflows: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("workflow has {} validation error(s); execution refused", .0.len())]
    Rejected(Vec<Diagnostic>),

    #[error("failed to serialize workflow: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to run engine process: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("config patch of type {patch} does not match node {node_id} of type {node_type}")]
    ConfigTypeMismatch {
        node_id: String,
        node_type: &'static str,
        patch: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
