use crate::aggregator::rank_and_filter;
use crate::catalog::ShopCatalog;
use crate::configuration::Settings;
use crate::data_models::{Location, SearchParams, Shop};
use crate::errors::AppErrors;
use crate::places::DirectoryClient;
use crate::prefs::{PreferenceStore, Storage};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub directory: DirectoryClient,
    pub prefs: Arc<PreferenceStore>,
    pub catalog: Arc<ShopCatalog>,
}

impl AppState {
    pub fn try_init(settings: &Settings) -> Result<Self, AppErrors> {
        settings.storage.check_if_valid()?;
        let storage = Storage::try_from(&settings.storage)?;
        let directory = DirectoryClient::try_from(&settings.directory)?;
        Ok(Self {
            directory,
            prefs: Arc::new(PreferenceStore::new(storage)),
            catalog: Arc::new(ShopCatalog::default()),
        })
    }

    /// Runs a full search: directory fetch, preference merge, ranking,
    /// then stores the result in the catalog. Overlapping searches are
    /// resolved last-initiated-wins via the catalog's generation ids.
    pub async fn search(&self, origin: Location, params: SearchParams) -> Vec<Shop> {
        let generation = self.catalog.begin_search();
        let raw_shops = self.directory.search_nearby(origin, params.radius_km).await;
        let prefs = self.prefs.load().await;
        let ranked = rank_and_filter(raw_shops, &prefs, &params);
        self.catalog.store(generation, ranked.clone());
        ranked
    }

    /// Re-filters the in-memory shop list after a blacklist change,
    /// without refetching from the directory.
    pub async fn blacklist_changed(&self) {
        let prefs = self.prefs.load().await;
        self.catalog.apply_blacklist(&prefs);
    }
}
