use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;
use validator::Validate;

pub type ShopId = String;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: f64,
    pub text: String,
    #[serde(with = "time::serde::timestamp")]
    pub time: OffsetDateTime,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub address: String,
    pub location: Location,
    pub thumbnail: String,
    pub rating: f64,
    pub reviews: Vec<Review>,
    pub has_food_panda: bool,
    pub food_panda_link: Option<String>,
    pub has_uber_eats: bool,
    pub uber_eats_link: Option<String>,
    pub distance: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub favorites: Vec<ShopId>,
    pub blacklist: Vec<ShopId>,
    pub ratings: HashMap<ShopId, f64>,
}

impl UserPreferences {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|fav| fav == id)
    }

    pub fn is_blacklisted(&self, id: &str) -> bool {
        self.blacklist.iter().any(|banned| banned == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(range(exclusive_min = 0.0))]
    pub radius_km: f64,
    #[serde(default)]
    pub show_favorites_only: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            radius_km: 1.0,
            show_favorites_only: false,
        }
    }
}
