use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bn4::ChipCodes;

use super::error::{CoreError, CoreErrorCode};
use super::types::ChipCatalogEntry;

/// Chip names and code letters, indexed by chip id.
///
/// Loaded from a JSON array whose elements are either `null` (no chip with
/// that id) or `{"name": ..., "codes": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipCatalog {
    entries: Vec<Option<ChipCatalogEntry>>,
}

impl ChipCatalog {
    pub fn new(entries: Vec<Option<ChipCatalogEntry>>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<Option<ChipCatalogEntry>> = serde_json::from_str(json).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("invalid chip catalog: {e}"))
        })?;
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = fs::read_to_string(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let catalog = Self::from_json_str(&json)?;
        debug!(
            path = %path.display(),
            chips = catalog.iter().count(),
            "loaded chip catalog"
        );
        Ok(catalog)
    }

    pub fn get(&self, id: usize) -> Option<&ChipCatalogEntry> {
        self.entries.get(id).and_then(Option::as_ref)
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }

    /// Number of id slots, including empty ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Present entries with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ChipCatalogEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(id, entry)| entry.as_ref().map(|entry| (id, entry)))
    }
}

impl ChipCodes for ChipCatalog {
    fn chip_codes(&self, id: usize) -> Option<&str> {
        self.get(id).map(|entry| entry.codes.as_str())
    }
}
