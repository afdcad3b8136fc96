use crate::data_models::{ShopId, UserPreferences};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::error;

mod errors;
pub mod storage;

pub use errors::StorageError;
pub use storage::Storage;

const FAVORITES_KEY: &str = "favorites";
const BLACKLIST_KEY: &str = "blacklist";
const RATINGS_KEY: &str = "ratings";

/// Durable favorites/blacklist/ratings state on top of a key/value
/// [`Storage`].
///
/// Reads fail open into empty defaults, mutations report success as a
/// boolean and never panic. Every mutation is a read-modify-write cycle
/// serialized behind a mutex so the "no duplicate id" and "blacklist
/// evicts favorite" invariants hold under concurrent callers.
#[derive(Debug)]
pub struct PreferenceStore {
    storage: Storage,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> UserPreferences {
        UserPreferences {
            favorites: self.read_ids(FAVORITES_KEY).await,
            blacklist: self.read_ids(BLACKLIST_KEY).await,
            ratings: self.read_ratings().await,
        }
    }

    pub async fn add_favorite(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut favorites = self.read_ids(FAVORITES_KEY).await;
        if favorites.iter().any(|fav| fav == id) {
            return false;
        }
        favorites.push(id.to_string());
        if !self.write_ids(FAVORITES_KEY, &favorites).await {
            return false;
        }
        // favorites and blacklist are mutually exclusive
        let blacklist = self.read_ids(BLACKLIST_KEY).await;
        if blacklist.iter().any(|banned| banned == id) {
            self.remove_blacklist_unlocked(id).await;
        }
        true
    }

    pub async fn remove_favorite(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        self.remove_favorite_unlocked(id).await
    }

    pub async fn add_blacklist(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut blacklist = self.read_ids(BLACKLIST_KEY).await;
        if blacklist.iter().any(|banned| banned == id) {
            return false;
        }
        blacklist.push(id.to_string());
        if !self.write_ids(BLACKLIST_KEY, &blacklist).await {
            return false;
        }
        // a blacklisted shop cannot stay a favorite
        let favorites = self.read_ids(FAVORITES_KEY).await;
        if favorites.iter().any(|fav| fav == id) {
            self.remove_favorite_unlocked(id).await;
        }
        true
    }

    pub async fn remove_blacklist(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        self.remove_blacklist_unlocked(id).await
    }

    pub async fn set_rating(&self, id: &str, rating: f64) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut ratings = self.read_ratings().await;
        ratings.insert(id.to_string(), rating);
        match serde_json::to_string(&ratings) {
            Ok(data) => self.write_key(RATINGS_KEY, data).await,
            Err(e) => {
                error!("failed to serialize ratings: {e}");
                false
            }
        }
    }

    pub async fn toggle_favorite(&self, id: &str) -> bool {
        let favorites = self.read_ids(FAVORITES_KEY).await;
        if favorites.iter().any(|fav| fav == id) {
            self.remove_favorite(id).await
        } else {
            self.add_favorite(id).await
        }
    }

    pub async fn toggle_blacklist(&self, id: &str) -> bool {
        let blacklist = self.read_ids(BLACKLIST_KEY).await;
        if blacklist.iter().any(|banned| banned == id) {
            self.remove_blacklist(id).await
        } else {
            self.add_blacklist(id).await
        }
    }

    async fn remove_favorite_unlocked(&self, id: &str) -> bool {
        let mut favorites = self.read_ids(FAVORITES_KEY).await;
        favorites.retain(|fav| fav != id);
        self.write_ids(FAVORITES_KEY, &favorites).await
    }

    async fn remove_blacklist_unlocked(&self, id: &str) -> bool {
        let mut blacklist = self.read_ids(BLACKLIST_KEY).await;
        blacklist.retain(|banned| banned != id);
        self.write_ids(BLACKLIST_KEY, &blacklist).await
    }

    async fn read_ids(&self, key: &str) -> Vec<ShopId> {
        match self.storage.get(key).await {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_else(|e| {
                error!("failed to deserialize {key}: {e}");
                vec![]
            }),
            Ok(None) => vec![],
            Err(e) => {
                error!("failed to read {key}: {e}");
                vec![]
            }
        }
    }

    async fn read_ratings(&self) -> HashMap<ShopId, f64> {
        match self.storage.get(RATINGS_KEY).await {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_else(|e| {
                error!("failed to deserialize {RATINGS_KEY}: {e}");
                HashMap::new()
            }),
            Ok(None) => HashMap::new(),
            Err(e) => {
                error!("failed to read {RATINGS_KEY}: {e}");
                HashMap::new()
            }
        }
    }

    async fn write_ids(&self, key: &str, ids: &[ShopId]) -> bool {
        match serde_json::to_string(ids) {
            Ok(data) => self.write_key(key, data).await,
            Err(e) => {
                error!("failed to serialize {key}: {e}");
                false
            }
        }
    }

    async fn write_key(&self, key: &str, data: String) -> bool {
        match self.storage.set(key, data).await {
            Ok(()) => true,
            Err(e) => {
                error!("failed to persist {key}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::storage::{FileStorage, MemoryStorage};

    fn create_test_store() -> PreferenceStore {
        PreferenceStore::new(Storage::InMemory(MemoryStorage::default()))
    }

    #[tokio::test]
    async fn load_with_no_prior_state_is_empty() {
        let store = create_test_store();
        let prefs = store.load().await;
        assert!(prefs.favorites.is_empty());
        assert!(prefs.blacklist.is_empty());
        assert!(prefs.ratings.is_empty());
    }

    #[tokio::test]
    async fn add_favorite_works_once() {
        let store = create_test_store();
        assert!(store.add_favorite("a").await);
        assert!(!store.add_favorite("a").await);
        let prefs = store.load().await;
        assert_eq!(prefs.favorites, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn remove_favorite_is_idempotent() {
        let store = create_test_store();
        assert!(store.add_favorite("a").await);
        assert!(store.remove_favorite("a").await);
        assert!(store.remove_favorite("a").await);
        assert!(store.load().await.favorites.is_empty());
    }

    #[tokio::test]
    async fn add_blacklist_evicts_favorite() {
        let store = create_test_store();
        assert!(store.add_favorite("a").await);
        assert!(store.add_blacklist("a").await);
        let prefs = store.load().await;
        assert!(prefs.favorites.is_empty());
        assert_eq!(prefs.blacklist, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn add_blacklist_twice_fails_second_time() {
        let store = create_test_store();
        assert!(store.add_blacklist("a").await);
        assert!(!store.add_blacklist("a").await);
        assert_eq!(store.load().await.blacklist, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn remove_blacklist_is_idempotent() {
        let store = create_test_store();
        assert!(store.add_blacklist("a").await);
        assert!(store.remove_blacklist("a").await);
        assert!(store.remove_blacklist("a").await);
        assert!(store.load().await.blacklist.is_empty());
    }

    #[tokio::test]
    async fn set_rating_upserts() {
        let store = create_test_store();
        assert!(store.set_rating("a", 3.0).await);
        assert!(store.set_rating("a", 5.0).await);
        let prefs = store.load().await;
        assert_eq!(prefs.ratings.get("a").copied(), Some(5.0));
    }

    #[tokio::test]
    async fn toggle_favorite_flips_membership() {
        let store = create_test_store();
        assert!(store.toggle_favorite("a").await);
        assert!(store.load().await.is_favorite("a"));
        assert!(store.toggle_favorite("a").await);
        assert!(!store.load().await.is_favorite("a"));
    }

    #[tokio::test]
    async fn toggle_blacklist_flips_membership() {
        let store = create_test_store();
        assert!(store.toggle_blacklist("a").await);
        assert!(store.load().await.is_blacklisted("a"));
        assert!(store.toggle_blacklist("a").await);
        assert!(!store.load().await.is_blacklisted("a"));
    }

    #[tokio::test]
    async fn add_favorite_evicts_blacklist_entry() {
        let store = create_test_store();
        assert!(store.add_blacklist("a").await);
        assert!(store.add_favorite("a").await);
        let prefs = store.load().await;
        assert_eq!(prefs.favorites, vec!["a".to_string()]);
        assert!(prefs.blacklist.is_empty());
    }

    #[tokio::test]
    async fn favorites_and_blacklist_stay_disjoint() {
        let store = create_test_store();
        store.add_favorite("a").await;
        store.add_favorite("b").await;
        store.add_blacklist("a").await;
        store.toggle_blacklist("b").await;
        store.toggle_blacklist("c").await;
        store.add_favorite("c").await;
        store.remove_blacklist("b").await;
        let prefs = store.load().await;
        for fav in &prefs.favorites {
            assert!(!prefs.blacklist.contains(fav));
        }
    }

    #[tokio::test]
    async fn preferences_keep_insertion_order() {
        let store = create_test_store();
        store.add_favorite("c").await;
        store.add_favorite("a").await;
        store.add_favorite("b").await;
        assert_eq!(
            store.load().await.favorites,
            vec!["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test]
    async fn mutations_report_failed_persistence_writes() {
        // pointing the file storage at a directory makes every read and
        // write on it error out
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = Storage::File(FileStorage::new(dir.path().to_path_buf()));
        let store = PreferenceStore::new(storage);

        assert!(!store.add_favorite("a").await);
        assert!(!store.add_blacklist("a").await);
        assert!(!store.set_rating("a", 4.0).await);

        let prefs = store.load().await;
        assert!(prefs.favorites.is_empty());
        assert!(prefs.blacklist.is_empty());
        assert!(prefs.ratings.is_empty());
    }

    #[tokio::test]
    async fn load_fails_open_on_corrupt_state() {
        let storage = Storage::InMemory(MemoryStorage::default());
        storage
            .set("favorites", "not json".to_string())
            .await
            .expect("Failed to set key");
        let store = PreferenceStore::new(storage);
        assert!(store.load().await.favorites.is_empty());
    }
}
