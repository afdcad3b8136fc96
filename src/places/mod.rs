mod client;
mod errors;
mod response;

pub use client::DirectoryClient;
pub use errors::PlacesError;
