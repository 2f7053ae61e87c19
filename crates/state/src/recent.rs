//! Recently used fields
//!
//! A small per-category MRU list (measures, dimensions, segments) so the
//! picker can surface what the user reached for last. Bounded, deduplicated,
//! most-recent-first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::persist::RECENT_FIELDS_KEY;
use crate::storage::Storage;

/// Entries kept per category
pub const MAX_RECENT_FIELDS: usize = 10;

/// Per-category most-recently-used field lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFields {
    #[serde(flatten)]
    categories: BTreeMap<String, Vec<String>>,
}

impl RecentFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use of `field`; it moves (or inserts) to the front of its
    /// category, and the category is trimmed to [`MAX_RECENT_FIELDS`]
    pub fn touch(&mut self, category: &str, field: &str) {
        let list = self.categories.entry(category.to_string()).or_default();
        list.retain(|f| f != field);
        list.insert(0, field.to_string());
        list.truncate(MAX_RECENT_FIELDS);
    }

    /// Fields for a category, most recent first
    pub fn list(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Best-effort load; corrupt or missing data yields an empty list
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(raw) = storage.get(RECENT_FIELDS_KEY) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(fields) => fields,
            Err(err) => {
                debug!(error = %err, "discarding unreadable recent-fields list");
                Self::default()
            }
        }
    }

    /// Best-effort save
    pub fn save(&self, storage: &dyn Storage) {
        if let Ok(raw) = serde_json::to_string(self) {
            storage.set(RECENT_FIELDS_KEY, &raw);
        }
    }
}
