use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("directory request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("failed to parse string as url: {0}")]
    UrlParseError(#[from] url::ParseError),
}
