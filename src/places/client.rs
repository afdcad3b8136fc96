use crate::configuration::DirectorySettings;
use crate::data_models::{Location, Review, Shop};
use crate::geo::distance_km;
use crate::places::errors::PlacesError;
use crate::places::response::{
    DetailsResponse, NearbyCandidate, NearbySearchResponse, PlaceDetails, RawPhoto, RawReview,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::warn;
use url::Url;

const STATUS_OK: &str = "OK";
const DETAIL_FIELDS: &str = "name,rating,reviews,photos,geometry,vicinity,website,url";
const MAX_REVIEWS: usize = 3;
const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/400x200?text=No+Image";
const FOOD_PANDA_TOKEN: &str = "foodpanda";
const FOOD_PANDA_HOME: &str = "https://www.foodpanda.com.tw/";
const UBER_EATS_TOKEN: &str = "ubereats";
const UBER_EATS_HOME: &str = "https://www.ubereats.com/tw";

/// Client for the external places directory.
///
/// Both lookups fail soft: a non-`OK` directory status, a transport error
/// or a malformed body degrades to an empty/absent result instead of an
/// error, so a flaky directory never takes the rest of the app down.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: Url,
    api_key: String,
    language: String,
    keyword: String,
}

impl DirectoryClient {
    pub fn try_from(settings: &DirectorySettings) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        // the base URL must end with a slash so join() appends endpoints
        // instead of replacing the last path segment
        let normalized = format!("{}/", settings.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            base_url: Url::parse(&normalized)?,
            api_key: settings.api_key.to_owned(),
            language: settings.language.to_owned(),
            keyword: settings.keyword.to_owned(),
        })
    }

    /// Searches the directory for drink shops around `origin`, then fetches
    /// details for every candidate concurrently. Candidates whose detail
    /// lookup fails are dropped; a failed search returns an empty list.
    pub async fn search_nearby(&self, origin: Location, radius_km: f64) -> Vec<Shop> {
        let radius_m = (radius_km * 1000.0).round() as u32;
        let url = match self.nearby_search_url(origin, radius_m) {
            Ok(url) => url,
            Err(e) => {
                warn!("failed to build nearby-search url: {e}");
                return vec![];
            }
        };
        let response: NearbySearchResponse = match self.fetch_json(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("nearby search failed: {e}");
                return vec![];
            }
        };
        if response.status != STATUS_OK {
            warn!(status = %response.status, "nearby search returned no results");
            return vec![];
        }

        let mut lookups = Vec::with_capacity(response.results.len());
        for candidate in response.results {
            let client = self.clone();
            lookups.push(tokio::spawn(async move {
                let details = client.fetch_details(&candidate.place_id).await?;
                Some(client.shop_from_candidate(candidate, details, origin))
            }));
        }
        // awaiting in spawn order keeps the directory's ordering
        let mut shops = Vec::with_capacity(lookups.len());
        for lookup in lookups {
            if let Ok(Some(shop)) = lookup.await {
                shops.push(shop);
            }
        }
        shops
    }

    /// Fetches a single shop by id. `None` means "unavailable", whatever
    /// the reason; callers decide how to present that.
    pub async fn get_details(&self, shop_id: &str) -> Option<Shop> {
        let details = self.fetch_details(shop_id).await?;
        let name = details.name.clone()?;
        let geometry = details.geometry.as_ref()?;
        Some(Shop {
            id: shop_id.to_string(),
            name,
            address: details.vicinity.clone(),
            location: Location {
                latitude: geometry.location.lat,
                longitude: geometry.location.lng,
            },
            thumbnail: self.thumbnail_url(&details.photos),
            rating: details.rating.unwrap_or(0.0),
            reviews: extract_reviews(&details.reviews),
            distance: None,
            ..delivery_fields(&details)
        })
    }

    async fn fetch_details(&self, place_id: &str) -> Option<PlaceDetails> {
        let url = match self.details_url(place_id) {
            Ok(url) => url,
            Err(e) => {
                warn!("failed to build details url: {e}");
                return None;
            }
        };
        let response: DetailsResponse = match self.fetch_json(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(place_id, "details lookup failed: {e}");
                return None;
            }
        };
        if response.status != STATUS_OK {
            warn!(place_id, status = %response.status, "details lookup rejected");
            return None;
        }
        response.result
    }

    fn shop_from_candidate(
        &self,
        candidate: NearbyCandidate,
        details: PlaceDetails,
        origin: Location,
    ) -> Shop {
        let location = Location {
            latitude: candidate.geometry.location.lat,
            longitude: candidate.geometry.location.lng,
        };
        Shop {
            id: candidate.place_id,
            name: candidate.name,
            address: candidate.vicinity,
            location,
            thumbnail: self.thumbnail_url(&details.photos),
            rating: candidate.rating.unwrap_or(0.0),
            reviews: extract_reviews(&details.reviews),
            distance: Some(distance_km(
                origin.latitude,
                origin.longitude,
                location.latitude,
                location.longitude,
            )),
            ..delivery_fields(&details)
        }
    }

    fn nearby_search_url(&self, origin: Location, radius_m: u32) -> Result<Url, PlacesError> {
        let mut url = self.base_url.join("nearbysearch/json")?;
        url.query_pairs_mut()
            .append_pair(
                "location",
                &format!("{},{}", origin.latitude, origin.longitude),
            )
            .append_pair("radius", &radius_m.to_string())
            .append_pair("type", "cafe")
            .append_pair("keyword", &self.keyword)
            .append_pair("language", &self.language)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    fn details_url(&self, place_id: &str) -> Result<Url, PlacesError> {
        let mut url = self.base_url.join("details/json")?;
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("fields", DETAIL_FIELDS)
            .append_pair("language", &self.language)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    fn thumbnail_url(&self, photos: &[RawPhoto]) -> String {
        let Some(photo) = photos.first() else {
            return PLACEHOLDER_THUMBNAIL.to_string();
        };
        match self.base_url.join("photo") {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("maxwidth", "400")
                    .append_pair("photoreference", &photo.photo_reference)
                    .append_pair("key", &self.api_key);
                url.to_string()
            }
            Err(_) => PLACEHOLDER_THUMBNAIL.to_string(),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PlacesError> {
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }
}

fn extract_reviews(raw: &[RawReview]) -> Vec<Review> {
    raw.iter()
        .take(MAX_REVIEWS)
        .filter_map(|review| {
            Some(Review {
                author: review.author_name.to_owned(),
                rating: review.rating,
                text: review.text.to_owned(),
                time: OffsetDateTime::from_unix_timestamp(review.time).ok()?,
            })
        })
        .collect()
}

/// Derives the delivery-platform fields from the directory's website and
/// canonical-url fields; everything else in the returned value is default.
fn delivery_fields(details: &PlaceDetails) -> Shop {
    let website = details.website.as_deref().unwrap_or("");
    let canonical = details.url.as_deref().unwrap_or("");
    let has_food_panda =
        website.contains(FOOD_PANDA_TOKEN) || canonical.contains(FOOD_PANDA_TOKEN);
    let has_uber_eats = website.contains(UBER_EATS_TOKEN) || canonical.contains(UBER_EATS_TOKEN);
    Shop {
        has_food_panda,
        food_panda_link: has_food_panda.then(|| {
            if website.contains(FOOD_PANDA_TOKEN) {
                website.to_string()
            } else {
                FOOD_PANDA_HOME.to_string()
            }
        }),
        has_uber_eats,
        uber_eats_link: has_uber_eats.then(|| {
            if website.contains(UBER_EATS_TOKEN) {
                website.to_string()
            } else {
                UBER_EATS_HOME.to_string()
            }
        }),
        ..Default::default()
    }
}
