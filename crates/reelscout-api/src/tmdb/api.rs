//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::TmdbError;
use super::types::{Credits, MovieDetail, SearchPage, TrendingWindow, Video};

/// TMDB movie API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches popular movies.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn popular(&self, page: u32) -> Result<SearchPage, TmdbError>;

    /// Fetches trending movies for the given time window.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn trending(&self, window: TrendingWindow) -> Result<SearchPage, TmdbError>;

    /// Fetches movies now playing in theaters.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn now_playing(&self, page: u32) -> Result<SearchPage, TmdbError>;

    /// Fetches upcoming movies.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn upcoming(&self, page: u32) -> Result<SearchPage, TmdbError>;

    /// Searches movies by title. Callers should not pass an empty query.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, TmdbError>;

    /// Fetches the first page of top rated movies, truncated to ten entries.
    ///
    /// Page and total counts are passed through from the API unchanged.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn top_rated(&self) -> Result<SearchPage, TmdbError>;

    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetail, TmdbError>;

    /// Fetches movie cast and crew.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn movie_credits(&self, movie_id: u64) -> Result<Credits, TmdbError>;

    /// Fetches trailers and other videos for a movie.
    ///
    /// # Errors
    ///
    /// Returns a classified `TmdbError` if the request fails.
    async fn movie_videos(&self, movie_id: u64) -> Result<Vec<Video>, TmdbError>;
}
