use serde::Deserialize;

/// Wire format of the directory's nearby-search endpoint. Anything that
/// does not match this shape is dropped rather than propagated.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<NearbyCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyCandidate {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    pub result: Option<PlaceDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: String,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
    pub website: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawReview {
    pub author_name: String,
    pub rating: f64,
    #[serde(default)]
    pub text: String,
    pub time: i64,
}

#[derive(Debug, Deserialize)]
pub struct RawPhoto {
    pub photo_reference: String,
}
