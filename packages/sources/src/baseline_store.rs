//! Baseline snapshot persistence.
//!
//! The baseline survives process restarts so that the 7-day validity
//! window is honored across deployments, not just within one process.
//! A JSON file store backs real runs; the in-memory store backs tests.

use std::path::PathBuf;
use std::sync::RwLock;

use audience_atlas_analytics_models::BaselineSnapshot;

use crate::SourceError;

/// Read/write access to the single current baseline snapshot.
pub trait BaselineStore: Send + Sync {
    /// Loads the current snapshot, if one has been persisted.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the store cannot be read.
    fn load(&self) -> Result<Option<BaselineSnapshot>, SourceError>;

    /// Persists a new snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the store cannot be written.
    fn save(&self, snapshot: &BaselineSnapshot) -> Result<(), SourceError>;
}

/// Baseline store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileBaselineStore {
    path: PathBuf,
}

impl JsonFileBaselineStore {
    /// Creates a store at the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BaselineStore for JsonFileBaselineStore {
    fn load(&self) -> Result<Option<BaselineSnapshot>, SourceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&contents)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &BaselineSnapshot) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, contents)?;
        log::debug!("persisted baseline snapshot to {}", self.path.display());
        Ok(())
    }
}

/// In-memory baseline store for tests and fixtures.
#[derive(Debug, Default)]
pub struct MemoryBaselineStore {
    snapshot: RwLock<Option<BaselineSnapshot>>,
}

impl MemoryBaselineStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: BaselineSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

impl BaselineStore for MemoryBaselineStore {
    fn load(&self) -> Result<Option<BaselineSnapshot>, SourceError> {
        Ok(self
            .snapshot
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, snapshot: &BaselineSnapshot) -> Result<(), SourceError> {
        *self
            .snapshot
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}
