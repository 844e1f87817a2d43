//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints, API key
//! storage, and image URL and display formatting helpers.

mod api;
mod client;
mod credential;
mod error;
mod format;
mod image;
mod page;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TOP_RATED_LIMIT, TmdbClient, TmdbClientBuilder};
pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
#[allow(clippy::module_name_repetitions)]
pub use error::TmdbError;
pub use format::{format_money, format_rating, format_runtime, release_year};
pub use image::{
    IMAGE_BASE_URL, ImageSize, PLACEHOLDER_IMAGE_URL, backdrop_url, image_url, poster_url,
    profile_url,
};
pub use page::load_movie_page;
pub use types::{
    CastMember, Credits, CrewMember, Genre, MovieDetail, MoviePage, MovieSummary,
    ProductionCompany, ProductionCountry, SearchPage, SpokenLanguage, TrendingWindow, Video,
};
