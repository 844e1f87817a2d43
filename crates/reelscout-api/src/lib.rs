//! API client library for reelscout.
//!
//! Provides the TMDB movie API client together with API key storage
//! and the helpers used to render its results.

/// TMDB API client.
pub mod tmdb;
