//! Persisted Selection Store: the user's saved items, the only client-owned
//! durable state.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use vca_core::ContentItem;

use crate::storage::{write_atomic, KeyValueStore, StorageError};

/// Storage key holding the JSON array of saved ids.
pub const SELECTION_KEY: &str = "viral-content-saved";

/// Serialized export of the saved items, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// `viral-content-export-YYYY-MM-DD.json`
    pub file_name: String,
    /// Pretty-printed JSON array of the exported items.
    pub contents: String,
    pub item_count: usize,
}

impl ExportDocument {
    /// Writes the document into `dir` under its dated file name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, StorageError> {
        write_atomic(dir, &self.file_name, &self.contents)
    }
}

/// Set of saved item ids, mirrored to durable storage on every change.
///
/// Ids are kept sorted so the stored document is stable: toggling an id
/// twice rewrites byte-identical content. Ids of items that no longer exist
/// upstream are kept; they simply match nothing on export.
pub struct SelectionStore {
    storage: Arc<dyn KeyValueStore>,
    ids: Mutex<BTreeSet<String>>,
}

impl SelectionStore {
    /// Creates an empty store backed by `storage`. Call [`SelectionStore::load`]
    /// to restore the persisted set.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            ids: Mutex::new(BTreeSet::new()),
        }
    }

    /// Restores the saved set from storage and returns its size.
    ///
    /// A missing entry yields an empty set. Unreadable or malformed content
    /// is logged and also yields an empty set instead of failing startup.
    pub fn load(&self) -> usize {
        let restored = match self.storage.get(SELECTION_KEY) {
            Ok(None) => BTreeSet::new(),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    tracing::warn!(
                        key = SELECTION_KEY,
                        error = %e,
                        "saved selection is malformed; starting with an empty selection"
                    );
                    BTreeSet::new()
                }
            },
            Err(e) => {
                tracing::warn!(
                    key = SELECTION_KEY,
                    error = %e,
                    "failed to read saved selection; starting with an empty selection"
                );
                BTreeSet::new()
            }
        };

        let count = restored.len();
        *self.lock() = restored;
        tracing::debug!(count, "restored saved selection");
        count
    }

    /// Flips membership of `id` and persists the full set. Returns `true`
    /// when `id` is now saved.
    ///
    /// A failed write is logged; the in-memory change stands.
    pub fn toggle(&self, id: &str) -> bool {
        let mut ids = self.lock();
        let selected = if ids.remove(id) {
            false
        } else {
            ids.insert(id.to_owned());
            true
        };
        self.persist(&ids);
        selected
    }

    #[must_use]
    pub fn all(&self) -> BTreeSet<String> {
        self.lock().clone()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Exports the items of `items` whose id is saved, in list order, as a
    /// document named for `date`. An empty selection yields `[]`.
    #[must_use]
    pub fn export_selection(&self, items: &[ContentItem], date: NaiveDate) -> ExportDocument {
        let ids = self.lock();
        let selected: Vec<&ContentItem> = items.iter().filter(|i| ids.contains(&i.id)).collect();
        drop(ids);

        let contents = serde_json::to_string_pretty(&selected).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to serialize export; exporting empty document");
            "[]".to_owned()
        });

        ExportDocument {
            file_name: format!("viral-content-export-{}.json", date.format("%Y-%m-%d")),
            contents,
            item_count: selected.len(),
        }
    }

    fn persist(&self, ids: &BTreeSet<String>) {
        let encoded = match serde_json::to_string(ids) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode saved selection");
                return;
            }
        };
        if let Err(e) = self.storage.set(SELECTION_KEY, &encoded) {
            tracing::warn!(key = SELECTION_KEY, error = %e, "failed to persist saved selection");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use vca_core::{ContentType, EngagementMetrics, Platform};

    use super::*;
    use crate::storage::MemoryStore;

    fn item(id: &str) -> ContentItem {
        ContentItem {
            id: id.to_owned(),
            platform: Platform::Google,
            title: format!("Item {id}"),
            content_text: None,
            url: format!("https://example.com/{id}"),
            author: None,
            published_date: None,
            scraped_date: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            engagement_metrics: EngagementMetrics::default(),
            viral_score: 10.0,
            content_type: ContentType::Article,
            tags: Vec::new(),
            thumbnail_url: None,
        }
    }

    fn store_with(raw: Option<&str>) -> (Arc<MemoryStore>, SelectionStore) {
        let backing = Arc::new(match raw {
            Some(raw) => MemoryStore::with_entry(SELECTION_KEY, raw),
            None => MemoryStore::new(),
        });
        let selection = SelectionStore::new(backing.clone());
        (backing, selection)
    }

    #[test]
    fn load_without_entry_is_empty() {
        let (_, selection) = store_with(None);
        assert_eq!(selection.load(), 0);
        assert!(selection.is_empty());
    }

    #[test]
    fn load_restores_ids() {
        let (_, selection) = store_with(Some(r#"["b","a"]"#));
        assert_eq!(selection.load(), 2);
        assert!(selection.contains("a"));
        assert!(selection.contains("b"));
    }

    #[test]
    fn load_tolerates_malformed_content() {
        let (_, selection) = store_with(Some("{not json"));
        assert_eq!(selection.load(), 0);

        let (_, selection) = store_with(Some(r#"{"ids":["a"]}"#));
        assert_eq!(selection.load(), 0);
    }

    #[test]
    fn toggle_persists_immediately() {
        let (backing, selection) = store_with(None);
        selection.load();
        assert!(selection.toggle("x"));
        assert_eq!(
            backing.get(SELECTION_KEY).unwrap().as_deref(),
            Some(r#"["x"]"#)
        );
        assert!(!selection.toggle("x"));
        assert_eq!(backing.get(SELECTION_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn toggle_twice_restores_set_and_storage() {
        let (backing, selection) = store_with(None);
        selection.load();
        selection.toggle("a");
        selection.toggle("c");
        let before_set = selection.all();
        let before_raw = backing.get(SELECTION_KEY).unwrap();

        for id in ["a", "b"] {
            selection.toggle(id);
            selection.toggle(id);
            assert_eq!(selection.all(), before_set);
            assert_eq!(backing.get(SELECTION_KEY).unwrap(), before_raw);
        }
    }

    #[test]
    fn export_contains_exactly_selected_items() {
        let (_, selection) = store_with(None);
        selection.toggle("2");
        let items = vec![item("1"), item("2"), item("3")];
        let date = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();

        let doc = selection.export_selection(&items, date);

        assert_eq!(doc.file_name, "viral-content-export-2025-06-07.json");
        assert_eq!(doc.item_count, 1);
        let exported: Vec<ContentItem> = serde_json::from_str(&doc.contents).unwrap();
        assert_eq!(exported, vec![item("2")]);
    }

    #[test]
    fn export_with_stale_ids_or_empty_selection_is_empty_array() {
        let (_, selection) = store_with(Some(r#"["gone"]"#));
        selection.load();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let doc = selection.export_selection(&[item("1")], date);
        assert_eq!(doc.item_count, 0);
        assert_eq!(doc.contents, "[]");
    }

    #[test]
    fn export_document_writes_dated_file() {
        let (_, selection) = store_with(None);
        selection.toggle("1");
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let doc = selection.export_selection(&[item("1")], date);
        let dir = tempfile::tempdir().unwrap();
        let path = doc.write_to(dir.path()).unwrap();
        assert!(path.ends_with("viral-content-export-2025-02-03.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), doc.contents);
    }
}
