//! Session-wide cache of loaded datasets.
//!
//! A [`DatasetCache`] is created once at startup and passed by reference to
//! whatever renders views. The first request for a `(records, geometry)`
//! path pair reads both files; later requests for the same pair get the same
//! [`Arc<Dataset>`] back without touching the disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Dataset, DatasetError, RecordsLoader, load_with};

/// Cache key: the two input paths exactly as requested.
type DatasetKey = (PathBuf, PathBuf);

/// Read-mostly cache of datasets keyed by their input paths.
#[derive(Debug, Default)]
pub struct DatasetCache {
    loader: RecordsLoader,
    entries: RwLock<BTreeMap<DatasetKey, Arc<Dataset>>>,
}

impl DatasetCache {
    /// Creates an empty cache that reads comma-delimited records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache that reads records with `loader`.
    #[must_use]
    pub fn with_loader(loader: RecordsLoader) -> Self {
        Self {
            loader,
            entries: RwLock::default(),
        }
    }

    /// Returns the dataset for the given paths, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset is not cached yet and loading
    /// it fails. Failed loads are not cached.
    pub fn get_or_load(
        &self,
        records_path: &Path,
        geometry_path: &Path,
    ) -> Result<Arc<Dataset>, DatasetError> {
        let key = (records_path.to_path_buf(), geometry_path.to_path_buf());

        if let Some(dataset) = self.read_entries().get(&key) {
            log::debug!("Dataset cache hit for {}", records_path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_with(&self.loader, records_path, geometry_path)?);

        // Another caller may have loaded the same pair meanwhile; keep theirs.
        let mut entries = self.write_entries();
        Ok(Arc::clone(entries.entry(key).or_insert(dataset)))
    }

    /// Drops the cached dataset for the given paths so the next request
    /// reloads it. Returns whether an entry was removed.
    pub fn invalidate(&self, records_path: &Path, geometry_path: &Path) -> bool {
        let key = (records_path.to_path_buf(), geometry_path.to_path_buf());
        self.write_entries().remove(&key).is_some()
    }

    /// Drops every cached dataset.
    pub fn clear(&self) {
        self.write_entries().clear();
    }

    /// Number of cached datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Whether nothing has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, BTreeMap<DatasetKey, Arc<Dataset>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, BTreeMap<DatasetKey, Arc<Dataset>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
