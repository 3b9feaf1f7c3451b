//! Recently searched cities, persisted through a [`KeyValueStore`].

use crate::storage::KeyValueStore;

/// Key under which the list is persisted.
pub const HISTORY_KEY: &str = "search_history";

/// Number of cities kept.
pub const HISTORY_CAP: usize = 5;

/// Most-recent-first list of distinct (case-insensitive) city names.
pub struct RecentSearchStore<S: KeyValueStore> {
    store: S,
    entries: Vec<String>,
}

impl<S: KeyValueStore> std::fmt::Debug for RecentSearchStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearchStore").field("entries", &self.entries).finish()
    }
}

impl<S: KeyValueStore> RecentSearchStore<S> {
    /// Read the persisted list once. Anything unreadable is dropped and the
    /// list starts empty.
    pub fn load(store: S) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => normalize(list),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding corrupt search history");
                    if let Err(e) = store.remove(HISTORY_KEY) {
                        tracing::warn!(error = %e, "failed to remove corrupt search history");
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read search history");
                Vec::new()
            }
        };

        Self { store, entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put `city` at the front, replacing any entry that differs only in case.
    /// The casing just typed wins. Blank input leaves the list untouched.
    pub fn record(&mut self, city: &str) -> &[String] {
        let city = city.trim();
        if city.is_empty() {
            return &self.entries;
        }

        let lower = city.to_lowercase();
        self.entries.retain(|c| c.to_lowercase() != lower);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(HISTORY_CAP);

        self.persist();
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::warn!(error = %e, "failed to clear search history");
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(HISTORY_KEY, &json));

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist search history");
        }
    }
}

/// Trim, drop blanks and case-insensitive repeats (first one wins), then cap.
fn normalize(list: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    list.into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
        .take(HISTORY_CAP)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use std::sync::Arc;

    fn fresh() -> (Arc<MemoryStore>, RecentSearchStore<Arc<MemoryStore>>) {
        let backing = Arc::new(MemoryStore::new());
        let history = RecentSearchStore::load(backing.clone());
        (backing, history)
    }

    #[test]
    fn same_city_different_case_keeps_latest_casing() {
        let (_, mut history) = fresh();

        history.record("Paris");
        let list = history.record("paris");

        assert_eq!(list, ["paris"]);
    }

    #[test]
    fn re_search_moves_to_front() {
        let (_, mut history) = fresh();
        for city in ["Oslo", "Lima", "Rome"] {
            history.record(city);
        }

        history.record("LIMA");

        assert_eq!(history.entries(), ["LIMA", "Rome", "Oslo"]);
    }

    #[test]
    fn sixth_city_evicts_oldest() {
        let (_, mut history) = fresh();
        for city in ["A", "B", "C", "D", "E", "F"] {
            history.record(city);
        }

        assert_eq!(history.entries(), ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn blank_and_padded_input() {
        let (backing, mut history) = fresh();

        history.record("   ");
        assert!(history.is_empty());
        assert_eq!(backing.get(HISTORY_KEY).unwrap(), None);

        history.record("  Cairo ");
        assert_eq!(history.entries(), ["Cairo"]);
    }

    #[test]
    fn every_record_is_persisted() {
        let (backing, mut history) = fresh();

        history.record("Berlin");
        history.record("Madrid");

        let reloaded = RecentSearchStore::load(backing);
        assert_eq!(reloaded.entries(), ["Madrid", "Berlin"]);
    }

    #[test]
    fn corrupt_data_is_discarded() {
        for raw in ["{not json", "{\"a\":1}", "[1,2,3]", "\"Paris\""] {
            let backing = Arc::new(MemoryStore::new());
            backing.set(HISTORY_KEY, raw).unwrap();

            let history = RecentSearchStore::load(backing.clone());

            assert!(history.is_empty(), "{raw} should load as empty");
            assert_eq!(backing.get(HISTORY_KEY).unwrap(), None);
        }
    }

    #[test]
    fn oversized_list_is_capped_on_load() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(HISTORY_KEY, r#"["a","b","c","d","e","f","g"]"#).unwrap();

        let history = RecentSearchStore::load(backing);

        assert_eq!(history.entries().len(), HISTORY_CAP);
        assert_eq!(history.get(0), Some("a"));
    }

    #[test]
    fn loaded_list_is_cleaned_up() {
        let backing = Arc::new(MemoryStore::new());
        backing
            .set(HISTORY_KEY, r#"["Paris","paris","   "," Oslo ","a","b","c","d"]"#)
            .unwrap();

        let history = RecentSearchStore::load(backing);

        assert_eq!(history.entries(), ["Paris", "Oslo", "a", "b", "c"]);
    }

    #[test]
    fn clear_removes_persisted_list() {
        let (backing, mut history) = fresh();
        history.record("Nairobi");

        history.clear();

        assert!(history.is_empty());
        assert_eq!(backing.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut history = RecentSearchStore::load(FileStore::new(dir.path()));
        history.record("Reykjavik");
        drop(history);

        let history = RecentSearchStore::load(FileStore::new(dir.path()));
        assert_eq!(history.entries(), ["Reykjavik"]);
    }
}
