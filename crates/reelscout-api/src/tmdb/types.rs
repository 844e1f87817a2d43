//! TMDB API response types.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

// --- Movie lists ---

/// Paging envelope returned by list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Current page number.
    pub page: u32,
    /// Movies on this page, in API order.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single movie as returned by list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD or empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs. Absent on the single-movie endpoint.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
}

// --- Movie details ---

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    /// Fields shared with list results.
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: u64,
    /// Release status (e.g., "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    /// Production countries.
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Production company entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
    /// Origin country (ISO 3166-1).
    #[serde(default)]
    pub origin_country: String,
}

/// Production country entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Country name.
    pub name: String,
}

/// Spoken language entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SpokenLanguage {
    /// ISO 639-1 code.
    pub iso_639_1: String,
    /// Language name.
    pub name: String,
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct Credits {
    /// Cast, ordered by billing.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A single cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Character name.
    #[serde(default)]
    pub character: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A single crew member.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Job title (e.g., "Director").
    #[serde(default)]
    pub job: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Videos ---

/// Response envelope from `movie/{movie_id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideosResponse {
    /// Videos in API order.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A trailer, teaser or clip attached to a movie.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// Video ID.
    pub id: String,
    /// Site-specific key (e.g., a YouTube video ID).
    pub key: String,
    /// Title.
    pub name: String,
    /// Hosting site (e.g., "YouTube").
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
    /// Publication timestamp.
    #[serde(default)]
    pub published_at: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Parameters ---

/// Time window for `trending/movie/{time_window}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    /// Trending over the last day.
    Day,
    /// Trending over the last week.
    #[default]
    Week,
}

impl TrendingWindow {
    /// Returns the path segment used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TrendingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => Err(format!("unknown time window '{other}' (expected day or week)")),
        }
    }
}

/// Combined result of a detail-page load.
#[derive(Debug, Clone)]
pub struct MoviePage {
    /// Movie details.
    pub detail: MovieDetail,
    /// Cast and crew.
    pub credits: Credits,
}
