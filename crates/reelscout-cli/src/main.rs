//! reelscout - terminal movie discovery client for TMDB.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelscout_api::tmdb::{
    CredentialStore, DEFAULT_BASE_URL, FileCredentialStore, ImageSize, LocalTmdbApi, MoviePage,
    SearchPage, TmdbClient, TmdbError, TrendingWindow, backdrop_url, format_money, format_rating,
    format_runtime, image_url, load_movie_page, poster_url, profile_url, release_year,
};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path, resolve_credentials_path};

/// Environment variable holding a fallback API key.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Manage the TMDB API key.
    Key(KeyCommand),
    /// Show or edit the config file.
    Config(ConfigCommand),
    /// List popular movies.
    Popular(PageArgs),
    /// List movies now playing in theaters.
    NowPlaying(PageArgs),
    /// List upcoming movies.
    Upcoming(PageArgs),
    /// List trending movies.
    Trending(TrendingArgs),
    /// List the top rated movies.
    TopRated,
    /// Search movies by title.
    Search(SearchArgs),
    /// Show movie details with cast and crew.
    Movie(MovieArgs),
    /// List videos (trailers, teasers) of a movie.
    Videos(VideosArgs),
    /// Resolve an image path to an absolute URL.
    ImageUrl(ImageUrlArgs),
}

/// Arguments for the `key` subcommand.
#[derive(clap::Args)]
struct KeyCommand {
    /// Key subcommand to run.
    #[command(subcommand)]
    command: KeySubcommands,
}

/// Available key subcommands.
#[derive(Subcommand)]
enum KeySubcommands {
    /// Validate an API key and store it.
    Set(KeySetArgs),
    /// Show whether an API key is available.
    Status(KeyStatusArgs),
    /// Remove the stored API key.
    Clear,
}

/// Arguments for the `key set` subcommand.
#[derive(clap::Args)]
struct KeySetArgs {
    /// TMDB API key (v3).
    #[arg(long)]
    key: String,
}

/// Arguments for the `key status` subcommand.
#[derive(clap::Args)]
struct KeyStatusArgs {
    /// Check the key against the API.
    #[arg(long)]
    verify: bool,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the config file location and effective settings.
    Show,
    /// Update settings and save the config file.
    Set(ConfigSetArgs),
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// API base URL override.
    #[arg(long, conflicts_with = "reset_base_url")]
    base_url: Option<String>,

    /// Remove the base URL override.
    #[arg(long)]
    reset_base_url: bool,
}

/// Paging arguments shared by listing subcommands.
#[derive(clap::Args)]
struct PageArgs {
    /// Result page (1-500).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=500))]
    page: u32,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Time window: day or week.
    #[arg(long, default_value_t = TrendingWindow::Week)]
    window: TrendingWindow,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Movie title to search for.
    #[arg(long, value_parser = parse_query)]
    query: String,

    /// Paging.
    #[command(flatten)]
    paging: PageArgs,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,

    /// Number of cast members to show.
    #[arg(long, default_value_t = 6)]
    cast: usize,
}

/// Arguments for the `videos` subcommand.
#[derive(clap::Args)]
struct VideosArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `image-url` subcommand.
#[derive(clap::Args)]
struct ImageUrlArgs {
    /// Image path as returned by the API (e.g. `/abc.jpg`).
    #[arg(long)]
    path: Option<String>,

    /// Size token: tiny, small, medium, large, extra-large or original.
    #[arg(long, default_value_t = ImageSize::Medium)]
    size: ImageSize,
}

/// Rejects blank search queries before any request is made.
fn parse_query(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(String::from("query must not be empty"));
    }
    Ok(String::from(trimmed))
}

/// Opens the credential store in the config directory.
///
/// # Errors
///
/// Returns an error if the config directory cannot be resolved.
fn build_credential_store(dir: Option<&PathBuf>) -> Result<FileCredentialStore> {
    let path = resolve_credentials_path(dir)?;
    let fallback = std::env::var(API_KEY_ENV).ok();
    Ok(FileCredentialStore::new(path).with_fallback(fallback.as_deref()))
}

/// Builds a TMDB client from config and the credential store.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;
    let store = build_credential_store(dir)?;

    let mut builder = TmdbClient::builder()
        .credential_store(Arc::new(store))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(base_url) = config.base_url()? {
        tracing::debug!(%base_url, "using base URL from config");
        builder = builder.base_url(base_url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Installs a Ctrl-C watcher that cancels `token`.
fn install_interrupt_handler(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling...");
            token.cancel();
        }
    })
}

// --- key ---

/// Runs the `key set` subcommand.
///
/// # Errors
///
/// Returns an error if the key is rejected by the API or cannot be stored.
#[instrument(skip_all)]
async fn run_key_set(args: &KeySetArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    tracing::info!("Validating API key...");
    client.register_credential(&args.key).await?;

    let path = resolve_credentials_path(dir)?;
    tracing::info!("API key saved to {}", path.display());
    Ok(())
}

/// Runs the `key status` subcommand.
///
/// # Errors
///
/// Returns an error if the credential file is unreadable or verification fails.
#[instrument(skip_all)]
async fn run_key_status(args: &KeyStatusArgs, dir: Option<&PathBuf>) -> Result<()> {
    let store = build_credential_store(dir)?;

    if store.stored_credential()?.is_some() {
        tracing::info!("API key: set ({})", store.path().display());
    } else if store.has_credential() {
        tracing::info!("API key: set ({API_KEY_ENV})");
    } else {
        tracing::info!(
            "API key: not set. Run `reelscout key set --key <KEY>` or set {API_KEY_ENV}"
        );
        return Ok(());
    }

    if args.verify {
        let client = build_tmdb_client(dir)?;
        let key = store.credential()?;
        client.probe_credential(&key).await?;
        tracing::info!("API key: valid");
    }
    Ok(())
}

/// Runs the `key clear` subcommand.
///
/// # Errors
///
/// Returns an error if the credential file cannot be updated.
fn run_key_clear(dir: Option<&PathBuf>) -> Result<()> {
    let store = build_credential_store(dir)?;
    store.clear_credential()?;

    tracing::info!("Stored API key removed");
    if store.has_credential() {
        tracing::info!("{API_KEY_ENV} is still set and will be used");
    }
    Ok(())
}

// --- config ---

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;

    tracing::info!("Config file: {}", path.display());
    match config.base_url()? {
        Some(url) => tracing::info!("Base URL: {url}"),
        None => tracing::info!("Base URL: {DEFAULT_BASE_URL} (default)"),
    }
    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if the new value is invalid or the config cannot be saved.
fn run_config_set(args: &ConfigSetArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&path)?;

    if args.reset_base_url {
        config.tmdb.base_url = None;
    } else if let Some(base_url) = &args.base_url {
        config.tmdb.base_url = Some(base_url.clone());
        config.base_url()?;
    }

    config.save(&path)?;
    tracing::info!("Config saved to {}", path.display());
    Ok(())
}

// --- listings ---

/// Renders a listing page as a table.
fn render_listing(page: &SearchPage) {
    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    tracing::info!("ID\tYear\tRating\tTitle");
    for movie in &page.results {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.id,
            release_year(movie.release_date.as_deref()).unwrap_or("-"),
            format_rating(movie.vote_average),
            movie.title,
        );
    }
}

/// Which listing endpoint to query.
enum Listing {
    Popular(u32),
    NowPlaying(u32),
    Upcoming(u32),
    Trending(TrendingWindow),
    TopRated,
    Search(String, u32),
}

/// Runs one of the listing subcommands.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_listing(listing: Listing, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    let page = match listing {
        Listing::Popular(page) => client.popular(page).await,
        Listing::NowPlaying(page) => client.now_playing(page).await,
        Listing::Upcoming(page) => client.upcoming(page).await,
        Listing::Trending(window) => client.trending(window).await,
        Listing::TopRated => client.top_rated().await,
        Listing::Search(query, page) => client.search(&query, page).await,
    }?;

    if page.results.is_empty() {
        tracing::info!("No movies found");
        return Ok(());
    }
    render_listing(&page);
    Ok(())
}

// --- detail ---

/// Renders the detail view of a movie.
fn render_movie_page(page: &MoviePage, cast_limit: usize) {
    let detail = &page.detail;
    let summary = &detail.summary;

    tracing::info!(
        "{} ({})",
        summary.title,
        release_year(summary.release_date.as_deref()).unwrap_or("-")
    );
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("\"{tagline}\"");
    }
    tracing::info!(
        "Rating: {} ({} votes)",
        format_rating(summary.vote_average),
        summary.vote_count
    );
    tracing::info!(
        "Runtime: {}",
        detail
            .runtime
            .filter(|r| *r > 0)
            .map_or_else(|| String::from("-"), format_runtime)
    );
    tracing::info!("Status: {}", detail.status.as_deref().unwrap_or("-"));
    let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", genres.join(", "));
    tracing::info!("Budget: {}", format_money(detail.budget));
    tracing::info!("Revenue: {}", format_money(detail.revenue));
    if let Some(homepage) = detail.homepage.as_deref().filter(|h| !h.is_empty()) {
        tracing::info!("Homepage: {homepage}");
    }
    tracing::info!("Poster: {}", poster_url(summary.poster_path.as_deref()));
    tracing::info!("Backdrop: {}", backdrop_url(summary.backdrop_path.as_deref()));

    if let Some(overview) = summary.overview.as_deref().filter(|o| !o.is_empty()) {
        tracing::info!("---");
        tracing::info!("{overview}");
    }

    let directors: Vec<&str> = page
        .credits
        .crew
        .iter()
        .filter(|c| c.job == "Director")
        .map(|c| c.name.as_str())
        .collect();
    if !directors.is_empty() {
        tracing::info!("---");
        tracing::info!("Directed by {}", directors.join(", "));
    }

    tracing::info!("---");
    tracing::info!("Top cast:");
    for member in page.credits.cast.iter().take(cast_limit) {
        tracing::info!(
            "  {} as {}\t{}",
            member.name,
            if member.character.is_empty() {
                "-"
            } else {
                &member.character
            },
            profile_url(member.profile_path.as_deref()),
        );
    }
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or either request fails.
#[instrument(skip_all)]
async fn run_movie(args: &MovieArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    let cancel = CancellationToken::new();
    let watcher = install_interrupt_handler(cancel.clone());
    let result = load_movie_page(&client, args.id, &cancel).await;
    watcher.abort();

    match result {
        Ok(page) => {
            render_movie_page(&page, args.cast);
            Ok(())
        }
        Err(TmdbError::Cancelled) => {
            tracing::info!("Movie load cancelled");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to load movie {}", args.id)),
    }
}

/// Runs the `videos` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_videos(args: &VideosArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;
    let videos = client.movie_videos(args.id).await?;

    if videos.is_empty() {
        tracing::info!("No videos found");
        return Ok(());
    }
    tracing::info!("Site\tType\tKey\t\tName");
    for video in &videos {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            video.site,
            video.kind,
            video.key,
            video.name
        );
    }
    Ok(())
}

/// Runs the `image-url` subcommand.
fn run_image_url(args: &ImageUrlArgs) {
    tracing::info!("{}", image_url(args.path.as_deref(), args.size));
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Key(key) => match key.command {
            KeySubcommands::Set(args) => run_key_set(&args, dir).await,
            KeySubcommands::Status(args) => run_key_status(&args, dir).await,
            KeySubcommands::Clear => run_key_clear(dir),
        },
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Set(args) => run_config_set(&args, dir),
        },
        Commands::Popular(args) => run_listing(Listing::Popular(args.page), dir).await,
        Commands::NowPlaying(args) => run_listing(Listing::NowPlaying(args.page), dir).await,
        Commands::Upcoming(args) => run_listing(Listing::Upcoming(args.page), dir).await,
        Commands::Trending(args) => run_listing(Listing::Trending(args.window), dir).await,
        Commands::TopRated => run_listing(Listing::TopRated, dir).await,
        Commands::Search(args) => {
            run_listing(Listing::Search(args.query, args.paging.page), dir).await
        }
        Commands::Movie(args) => run_movie(&args, dir).await,
        Commands::Videos(args) => run_videos(&args, dir).await,
        Commands::ImageUrl(args) => {
            run_image_url(&args);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::unreachable)]

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        // Arrange & Act & Assert
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_query_trims() {
        // Arrange & Act
        let query = parse_query("  fight club ").unwrap();

        // Assert
        assert_eq!(query, "fight club");
    }

    #[test]
    fn test_parse_query_rejects_blank() {
        // Arrange & Act
        let result = parse_query("   ");

        // Assert
        assert_eq!(result.unwrap_err(), "query must not be empty");
    }

    #[test]
    fn test_trending_window_defaults_to_week() {
        // Arrange & Act
        let cli = Cli::try_parse_from(["reelscout", "trending"]).unwrap();

        // Assert
        let Commands::Trending(args) = cli.command else {
            unreachable!("expected trending");
        };
        assert_eq!(args.window, TrendingWindow::Week);
    }

    #[test]
    fn test_page_out_of_range_rejected() {
        // Arrange & Act
        let result = Cli::try_parse_from(["reelscout", "popular", "--page", "501"]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_image_size_parsed_from_token() {
        // Arrange & Act
        let cli = Cli::try_parse_from([
            "reelscout",
            "image-url",
            "--path",
            "/a.jpg",
            "--size",
            "extra-large",
        ])
        .unwrap();

        // Assert
        let Commands::ImageUrl(args) = cli.command else {
            unreachable!("expected image-url");
        };
        assert_eq!(args.size, ImageSize::ExtraLarge);
        assert_eq!(args.path.as_deref(), Some("/a.jpg"));
    }
}
