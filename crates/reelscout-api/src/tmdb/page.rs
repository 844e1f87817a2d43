//! Detail-page loading.

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::error::TmdbError;
use super::types::MoviePage;

/// Loads details and credits for a movie concurrently.
///
/// Both requests must succeed; there is no partial result. If `cancel`
/// fires before both complete, in-flight requests are dropped and
/// `TmdbError::Cancelled` is returned.
///
/// # Errors
///
/// Returns the first error from either request, or `TmdbError::Cancelled`.
#[instrument(skip(api, cancel))]
pub async fn load_movie_page(
    api: &(impl LocalTmdbApi + Sync),
    movie_id: u64,
    cancel: &CancellationToken,
) -> Result<MoviePage, TmdbError> {
    let load = async {
        let (detail, credits) =
            tokio::try_join!(api.movie_details(movie_id), api.movie_credits(movie_id))?;
        Ok::<_, TmdbError>(MoviePage { detail, credits })
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!(movie_id, "movie page load cancelled");
            Err(TmdbError::Cancelled)
        }
        result = load => result,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tmdb::client::TmdbClient;
    use crate::tmdb::credential::{CredentialStore, MemoryCredentialStore};
    use crate::tmdb::types::{Credits, MovieDetail, SearchPage, TrendingWindow, Video};

    /// Mock API serving detail-page fixtures with configurable failures.
    struct MockTmdbApi {
        credits_fail: bool,
        credits_delay: Duration,
        call_count: AtomicU32,
    }

    impl MockTmdbApi {
        fn new() -> Self {
            Self {
                credits_fail: false,
                credits_delay: Duration::ZERO,
                call_count: AtomicU32::new(0),
            }
        }
    }

    fn unused<T>() -> Result<T, TmdbError> {
        Err(TmdbError::request_failed(
            reqwest::StatusCode::NOT_IMPLEMENTED,
            None,
        ))
    }

    impl LocalTmdbApi for MockTmdbApi {
        async fn popular(&self, _page: u32) -> Result<SearchPage, TmdbError> {
            unused()
        }

        async fn trending(&self, _window: TrendingWindow) -> Result<SearchPage, TmdbError> {
            unused()
        }

        async fn now_playing(&self, _page: u32) -> Result<SearchPage, TmdbError> {
            unused()
        }

        async fn upcoming(&self, _page: u32) -> Result<SearchPage, TmdbError> {
            unused()
        }

        async fn search(&self, _query: &str, _page: u32) -> Result<SearchPage, TmdbError> {
            unused()
        }

        async fn top_rated(&self) -> Result<SearchPage, TmdbError> {
            unused()
        }

        async fn movie_details(&self, _movie_id: u64) -> Result<MovieDetail, TmdbError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let json = include_str!("../../../../fixtures/tmdb/movie_details_550.json");
            Ok(serde_json::from_str(json).unwrap())
        }

        async fn movie_credits(&self, _movie_id: u64) -> Result<Credits, TmdbError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.credits_delay).await;
            if self.credits_fail {
                return Err(TmdbError::request_failed(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                ));
            }
            let json = include_str!("../../../../fixtures/tmdb/movie_credits_550.json");
            Ok(serde_json::from_str(json).unwrap())
        }

        async fn movie_videos(&self, _movie_id: u64) -> Result<Vec<Video>, TmdbError> {
            unused()
        }
    }

    #[tokio::test]
    async fn test_load_movie_page_combines_both() {
        // Arrange
        let mock = MockTmdbApi::new();
        let cancel = CancellationToken::new();

        // Act
        let page = load_movie_page(&mock, 550, &cancel).await.unwrap();

        // Assert
        assert_eq!(page.detail.summary.id, 550);
        assert_eq!(page.credits.cast.len(), 3);
        assert_eq!(mock.call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_movie_page_fails_when_credits_fail() {
        // Arrange
        let mock = MockTmdbApi {
            credits_fail: true,
            ..MockTmdbApi::new()
        };
        let cancel = CancellationToken::new();

        // Act
        let result = load_movie_page(&mock, 550, &cancel).await;

        // Assert
        assert!(matches!(
            result,
            Err(TmdbError::RequestFailed { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_load_movie_page_pre_cancelled_issues_no_requests() {
        // Arrange
        let mock = MockTmdbApi::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        // Act
        let result = load_movie_page(&mock, 550, &cancel).await;

        // Assert
        assert!(matches!(result, Err(TmdbError::Cancelled)));
        assert_eq!(mock.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_movie_page_cancelled_in_flight() {
        // Arrange
        let mock = MockTmdbApi {
            credits_delay: Duration::from_secs(30),
            ..MockTmdbApi::new()
        };
        let cancel = CancellationToken::new();
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        };

        // Act
        let start = std::time::Instant::now();
        let (result, ()) = tokio::join!(load_movie_page(&mock, 550, &cancel), canceller);

        // Assert
        assert!(matches!(result, Err(TmdbError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_load_movie_page_via_http_credits_failure() {
        // Arrange
        let mock_server = MockServer::start().await;
        let details_body = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        Mock::given(method("GET"))
            .and(path("/3/movie/550"))
            .respond_with(ResponseTemplate::new(200).set_body_string(details_body))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/550/credits"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let store = MemoryCredentialStore::new();
        store.set_credential("test-key").unwrap();
        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .credential_store(Arc::new(store))
            .user_agent("test/0.0.0")
            .build()
            .unwrap();
        let cancel = CancellationToken::new();

        // Act
        let result = load_movie_page(&client, 550, &cancel).await;

        // Assert
        assert!(matches!(
            result,
            Err(TmdbError::RequestFailed { status: 500, .. })
        ));
    }
}
