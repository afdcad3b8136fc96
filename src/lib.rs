pub mod aggregator;
pub mod app_state;
pub mod catalog;
pub mod configuration;
pub mod data_models;
pub mod errors;
pub mod geo;
pub mod places;
pub mod prefs;
mod routes;

use crate::app_state::AppState;
use crate::errors::Error;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_app(app_state: AppState) -> Result<Router, Error> {
    let app = Router::new()
        .route("/health_check", get(routes::health_check))
        .route("/search", post(routes::search))
        .route("/shops", get(routes::shops))
        .route("/shops/:id", get(routes::shop))
        .route("/preferences", get(routes::preferences))
        .route(
            "/favorites/:id",
            post(routes::add_favorite).delete(routes::remove_favorite),
        )
        .route("/favorites/:id/toggle", post(routes::toggle_favorite))
        .route(
            "/blacklist/:id",
            post(routes::add_blacklist).delete(routes::remove_blacklist),
        )
        .route("/blacklist/:id/toggle", post(routes::toggle_blacklist))
        .route("/ratings/:id", put(routes::set_rating))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);
    Ok(app)
}
