use crate::app_state::AppState;
use crate::data_models::{Location, SearchParams, Shop, UserPreferences};
use crate::errors::AppErrors;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Result};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub location: Location,
    pub params: SearchParams,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RatingRequest {
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f64,
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<Shop>>, AppErrors> {
    request.params.validate().map_err(AppErrors::from)?;
    let shops = state.search(request.location, request.params).await;
    Ok(Json(shops))
}

pub async fn shops(State(state): State<AppState>) -> Json<Vec<Shop>> {
    Json(state.catalog.current())
}

pub async fn shop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Shop>, AppErrors> {
    let shop = state
        .directory
        .get_details(&id)
        .await
        .ok_or(AppErrors::ShopNotFound)?;
    Ok(Json(shop))
}

pub async fn preferences(State(state): State<AppState>) -> Json<UserPreferences> {
    Json(state.prefs.load().await)
}

pub async fn add_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Json<bool> {
    Json(state.prefs.add_favorite(&id).await)
}

pub async fn remove_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Json<bool> {
    Json(state.prefs.remove_favorite(&id).await)
}

pub async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Json<bool> {
    Json(state.prefs.toggle_favorite(&id).await)
}

pub async fn add_blacklist(State(state): State<AppState>, Path(id): Path<String>) -> Json<bool> {
    let added = state.prefs.add_blacklist(&id).await;
    if added {
        state.blacklist_changed().await;
    }
    Json(added)
}

pub async fn remove_blacklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<bool> {
    Json(state.prefs.remove_blacklist(&id).await)
}

pub async fn toggle_blacklist(State(state): State<AppState>, Path(id): Path<String>) -> Json<bool> {
    let changed = state.prefs.toggle_blacklist(&id).await;
    if changed {
        state.blacklist_changed().await;
    }
    Json(changed)
}

pub async fn set_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RatingRequest>,
) -> Result<Json<bool>, AppErrors> {
    request.validate().map_err(AppErrors::from)?;
    Ok(Json(state.prefs.set_rating(&id, request.rating).await))
}
