use crate::places::PlacesError;
use crate::prefs::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    AppErrors(#[from] AppErrors),
}

#[derive(Error, Debug)]
pub enum AppErrors {
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error("invalid request: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("unable to load shop details")]
    ShopNotFound,
    #[error(transparent)]
    StorageError(#[from] StorageError),
    #[error(transparent)]
    DirectoryError(#[from] PlacesError),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("unknown storage type")]
    UnknownStorageType,
    #[error("file storage requires a file path")]
    MissingStorageSettings,
}

impl IntoResponse for AppErrors {
    fn into_response(self) -> Response {
        let status = match &self {
            AppErrors::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppErrors::ShopNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_not_found_maps_to_404() {
        let response = AppErrors::ShopNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn configuration_error_maps_to_500() {
        let response =
            AppErrors::ConfigurationError(ConfigurationError::UnknownStorageType).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
