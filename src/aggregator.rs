use crate::data_models::{SearchParams, Shop, UserPreferences};

/// Combines a raw directory result with the user's preferences: blacklisted
/// shops are dropped, the list is optionally restricted to favorites and the
/// remainder is sorted by distance. Shops without a distance sort last.
pub fn rank_and_filter(
    shops: Vec<Shop>,
    prefs: &UserPreferences,
    params: &SearchParams,
) -> Vec<Shop> {
    let mut kept: Vec<Shop> = shops
        .into_iter()
        .filter(|shop| !prefs.is_blacklisted(&shop.id))
        .collect();
    if params.show_favorites_only {
        kept.retain(|shop| prefs.is_favorite(&shop.id));
    }
    // sort_by is stable, so equal distances keep the directory order
    kept.sort_by(|a, b| {
        a.distance
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.distance.unwrap_or(f64::INFINITY))
    });
    kept
}

/// Removes blacklisted shops in place without touching the order.
pub fn drop_blacklisted(shops: &mut Vec<Shop>, prefs: &UserPreferences) {
    shops.retain(|shop| !prefs.is_blacklisted(&shop.id));
}
