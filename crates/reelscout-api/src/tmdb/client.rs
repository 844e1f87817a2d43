//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::credential::CredentialStore;
use super::error::TmdbError;
use super::types::{
    Credits, MovieDetail, SearchPage, TmdbErrorResponse, TrendingWindow, Video, VideosResponse,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Number of entries kept by `top_rated`.
pub const TOP_RATED_LIMIT: usize = 10;

/// Query parameter carrying the API key.
const API_KEY_PARAM: &str = "api_key";

/// Endpoint used to probe a candidate API key.
const PROBE_PATH: &str = "movie/popular";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Source of the API key, read on every request.
    credential_store: Arc<dyn CredentialStore>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credential_store: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the credential store (required).
    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `credential_store` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credential_store = self
            .credential_store
            .context("credential_store is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credential_store,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Credential store the client reads from.
    #[must_use]
    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        &self.credential_store
    }

    /// Checks a candidate API key against the live API without storing it.
    ///
    /// # Errors
    ///
    /// Returns `TmdbError::InvalidCredential` if the key is rejected, or any
    /// other classified error if the probe could not complete.
    #[instrument(skip_all)]
    pub async fn probe_credential(&self, api_key: &str) -> Result<(), TmdbError> {
        self.execute::<SearchPage>(Method::GET, PROBE_PATH, &[], api_key)
            .await
            .map(|_| ())
    }

    /// Validates `api_key` against the API and stores it only if accepted.
    ///
    /// # Errors
    ///
    /// - `TmdbError::MissingCredential` if the key is blank.
    /// - Any error from `probe_credential`; nothing is stored in that case.
    /// - `TmdbError::Storage` if the store cannot persist the key.
    #[instrument(skip_all)]
    pub async fn register_credential(&self, api_key: &str) -> Result<(), TmdbError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(TmdbError::MissingCredential);
        }

        self.probe_credential(api_key).await?;
        self.credential_store.set_credential(api_key)?;
        tracing::debug!("API key validated and stored");
        Ok(())
    }

    /// Builds the absolute request URL.
    ///
    /// `path` may already carry a query string; query pairs and the API key
    /// are appended with `&` in that case and with `?` otherwise. Values are
    /// percent-encoded (space becomes `%20`, not `+`).
    fn request_url(
        &self,
        path: &str,
        query: &[(&str, String)],
        api_key: &str,
    ) -> Result<Url, TmdbError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|source| TmdbError::InvalidUrl {
                path: String::from(path),
                source,
            })?;

        let mut pairs: Vec<String> = query
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect();
        pairs.push(format!("{API_KEY_PARAM}={}", urlencoding::encode(api_key)));
        let appended = pairs.join("&");

        let full_query = match url.query().filter(|q| !q.is_empty()) {
            Some(existing) => format!("{existing}&{appended}"),
            None => appended,
        };
        url.set_query(Some(&full_query));

        Ok(url)
    }

    /// Sends an authenticated request with the stored API key.
    #[instrument(skip_all)]
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let api_key = self.credential_store.credential()?;
        self.execute(method, path, query, &api_key).await
    }

    /// Sends a single request and classifies the outcome. No retries.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        api_key: &str,
    ) -> Result<T, TmdbError> {
        let url = self.request_url(path, query, api_key)?;

        // The URL carries the key; log the path only.
        tracing::debug!(%method, path, "TMDB API request");

        let response = self
            .http_client
            .request(method, url)
            .send()
            .await
            .map_err(|e| TmdbError::NetworkUnavailable(e.without_url()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "TMDB API rejected the API key");
            return Err(TmdbError::InvalidCredential);
        }

        let body = response
            .text()
            .await
            .map_err(|e| TmdbError::NetworkUnavailable(e.without_url()))?;

        if !status.is_success() {
            let error_response = serde_json::from_str::<TmdbErrorResponse>(&body).ok();
            tracing::warn!(
                path,
                status = status.as_u16(),
                tmdb_code = error_response.as_ref().map(|e| e.status_code),
                "TMDB API request failed"
            );
            let message = error_response.map(|e| e.status_message);
            return Err(TmdbError::request_failed(status, message.as_deref()));
        }

        serde_json::from_str(&body).map_err(TmdbError::DecodeError)
    }

    async fn movie_list(&self, path: &str, page: u32) -> Result<SearchPage, TmdbError> {
        let query = [("page", page.to_string())];
        self.request_json(Method::GET, path, &query).await
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn popular(&self, page: u32) -> Result<SearchPage, TmdbError> {
        self.movie_list("movie/popular", page).await
    }

    #[instrument(skip_all)]
    async fn trending(&self, window: TrendingWindow) -> Result<SearchPage, TmdbError> {
        let path = format!("trending/movie/{window}");
        self.request_json(Method::GET, &path, &[]).await
    }

    #[instrument(skip_all)]
    async fn now_playing(&self, page: u32) -> Result<SearchPage, TmdbError> {
        self.movie_list("movie/now_playing", page).await
    }

    #[instrument(skip_all)]
    async fn upcoming(&self, page: u32) -> Result<SearchPage, TmdbError> {
        self.movie_list("movie/upcoming", page).await
    }

    #[instrument(skip_all)]
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, TmdbError> {
        let query = [("query", String::from(query)), ("page", page.to_string())];
        self.request_json(Method::GET, "search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn top_rated(&self) -> Result<SearchPage, TmdbError> {
        let mut page = self.movie_list("movie/top_rated", 1).await?;
        page.results.truncate(TOP_RATED_LIMIT);
        Ok(page)
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetail, TmdbError> {
        let path = format!("movie/{movie_id}");
        self.request_json(Method::GET, &path, &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_credits(&self, movie_id: u64) -> Result<Credits, TmdbError> {
        let path = format!("movie/{movie_id}/credits");
        self.request_json(Method::GET, &path, &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_videos(&self, movie_id: u64) -> Result<Vec<Video>, TmdbError> {
        let path = format!("movie/{movie_id}/videos");
        let response: VideosResponse = self.request_json(Method::GET, &path, &[]).await?;
        Ok(response.results)
    }
}
