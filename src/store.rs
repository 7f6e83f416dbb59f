//! Persisted workflow list.
//!
//! The list lives under a single key and is always read and written whole.
//! Reading never fails: a missing key or unparseable contents yield an
//! empty list, and unreadable records inside a readable list are skipped.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::parse::types::Workflow;

pub trait WorkflowRepository {
    fn load_all(&self) -> Vec<Workflow>;

    /// Replace the whole stored list.
    fn save_all(&self, workflows: &[Workflow]) -> Result<(), StoreError>;

    /// Insert `workflow`, replacing any stored workflow with the same id.
    fn upsert(&self, workflow: &Workflow) -> Result<(), StoreError> {
        let mut all = self.load_all();
        match all.iter_mut().find(|w| w.id == workflow.id) {
            Some(existing) => *existing = workflow.clone(),
            None => all.push(workflow.clone()),
        }
        self.save_all(&all)
    }

    /// Remove the workflow with `id`. Returns whether one was stored.
    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut all = self.load_all();
        let before = all.len();
        all.retain(|w| w.id != id);
        if all.len() == before {
            return Ok(false);
        }
        self.save_all(&all)?;
        Ok(true)
    }
}

/// Records are decoded one by one, so a single unreadable workflow is
/// skipped instead of taking the rest of the list with it.
fn decode(key: &str, raw: &str) -> Vec<Workflow> {
    let records = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(key, error = %e, "stored workflow list is unreadable, starting empty");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Workflow>(record) {
            Ok(workflow) => Some(workflow),
            Err(e) => {
                warn!(key, index, error = %e, "skipping unreadable stored workflow");
                None
            }
        })
        .collect()
}

/// One JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn in_dir(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{}.json", key)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key(&self) -> String {
        self.path.display().to_string()
    }
}

impl WorkflowRepository for JsonFileStore {
    fn load_all(&self) -> Vec<Workflow> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&self.key(), &raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read workflow store");
                Vec::new()
            }
        }
    }

    /// Written to a sibling temp file, then renamed over the target, so a
    /// reader sees either the old list or the new one.
    fn save_all(&self, workflows: &[Workflow]) -> Result<(), StoreError> {
        let json = serde_json::to_string(workflows)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = workflows.len(), "saved workflows");
        Ok(())
    }
}

/// Keeps the serialized list in memory, with the same decode rules as the
/// file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose key already holds `raw`, e.g. corrupt data.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        MemoryStore {
            raw: Mutex::new(Some(raw.into())),
        }
    }
}

impl WorkflowRepository for MemoryStore {
    fn load_all(&self) -> Vec<Workflow> {
        let raw = self.raw.lock().unwrap_or_else(|e| e.into_inner());
        raw.as_deref()
            .map(|raw| decode("memory", raw))
            .unwrap_or_default()
    }

    fn save_all(&self, workflows: &[Workflow]) -> Result<(), StoreError> {
        let json = serde_json::to_string(workflows)?;
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = Some(json);
        Ok(())
    }
}
