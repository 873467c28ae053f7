//! USGS earthquake feed client.
//!
//! Provides blocking HTTP access to USGS summary feeds, plus reading a
//! saved feed from disk. Uses reqwest with rustls for TLS.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::QuakemapError;
use crate::models::FeatureCollection;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Available summary feeds: a magnitude threshold over a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedType {
    AllHour,
    #[default]
    AllDay,
    AllWeek,
    AllMonth,
    Mag1Hour,
    Mag1Day,
    Mag1Week,
    Mag1Month,
    Mag25Hour,
    Mag25Day,
    Mag25Week,
    Mag25Month,
    Mag45Hour,
    Mag45Day,
    Mag45Week,
    Mag45Month,
    SignificantHour,
    SignificantDay,
    SignificantWeek,
    SignificantMonth,
}

impl FeedType {
    /// Every feed, for parsing.
    const ALL: [Self; 20] = [
        Self::AllHour,
        Self::AllDay,
        Self::AllWeek,
        Self::AllMonth,
        Self::Mag1Hour,
        Self::Mag1Day,
        Self::Mag1Week,
        Self::Mag1Month,
        Self::Mag25Hour,
        Self::Mag25Day,
        Self::Mag25Week,
        Self::Mag25Month,
        Self::Mag45Hour,
        Self::Mag45Day,
        Self::Mag45Week,
        Self::Mag45Month,
        Self::SignificantHour,
        Self::SignificantDay,
        Self::SignificantWeek,
        Self::SignificantMonth,
    ];

    /// Get the URL path segment for this feed type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllHour => "all_hour",
            Self::AllDay => "all_day",
            Self::AllWeek => "all_week",
            Self::AllMonth => "all_month",
            Self::Mag1Hour => "1.0_hour",
            Self::Mag1Day => "1.0_day",
            Self::Mag1Week => "1.0_week",
            Self::Mag1Month => "1.0_month",
            Self::Mag25Hour => "2.5_hour",
            Self::Mag25Day => "2.5_day",
            Self::Mag25Week => "2.5_week",
            Self::Mag25Month => "2.5_month",
            Self::Mag45Hour => "4.5_hour",
            Self::Mag45Day => "4.5_day",
            Self::Mag45Week => "4.5_week",
            Self::Mag45Month => "4.5_month",
            Self::SignificantHour => "significant_hour",
            Self::SignificantDay => "significant_day",
            Self::SignificantWeek => "significant_week",
            Self::SignificantMonth => "significant_month",
        }
    }

    /// Full URL of this feed on the USGS site.
    #[must_use]
    pub fn url(self) -> String {
        feed_url(USGS_BASE_URL, self)
    }
}

impl std::str::FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|feed| feed.as_str() == wanted)
            .ok_or_else(|| format!("unknown feed type: {s}"))
    }
}

fn feed_url(base_url: &str, feed_type: FeedType) -> String {
    format!(
        "{base_url}/earthquakes/feed/v1.0/summary/{}.geojson",
        feed_type.as_str()
    )
}

/// Where a feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// One of the USGS summary feeds
    Usgs(FeedType),
    /// Any URL serving the same GeoJSON format
    Url(String),
    /// A feed saved to disk
    File(PathBuf),
}

impl FeedSource {
    /// Fetch or read the feed, one request per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed cannot be retrieved or is malformed.
    pub fn load(&self) -> Result<FeatureCollection, QuakemapError> {
        match self {
            Self::Usgs(feed_type) => UsgsClient::new()?.fetch_feed(*feed_type),
            Self::Url(url) => UsgsClient::new()?.fetch_url(url),
            Self::File(path) => read_feed(path),
        }
    }

    /// Short description for log lines.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Usgs(feed_type) => feed_type.url(),
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Client for USGS earthquake API.
pub struct UsgsClient {
    client: Client,
    base_url: String,
}

impl UsgsClient {
    /// Create a new USGS client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakemapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: USGS_BASE_URL.to_string(),
        })
    }

    /// Fetch a summary GeoJSON feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or response cannot be parsed.
    #[instrument(skip(self), fields(feed = feed_type.as_str()))]
    pub fn fetch_feed(&self, feed_type: FeedType) -> Result<FeatureCollection, QuakemapError> {
        let url = feed_url(&self.base_url, feed_type);
        self.fetch_url(&url)
    }

    /// Fetch a GeoJSON feed from an arbitrary URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or response cannot be parsed.
    #[instrument(skip(self))]
    pub fn fetch_url(&self, url: &str) -> Result<FeatureCollection, QuakemapError> {
        debug!("fetching feed from {}", url);

        let response = self.client.get(url).send()?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakemapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text()?;
        parse_feed(&body)
    }
}

/// Read a saved GeoJSON feed from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid feed.
#[instrument]
pub fn read_feed(path: &Path) -> Result<FeatureCollection, QuakemapError> {
    let body = std::fs::read_to_string(path)?;
    parse_feed(&body)
}

/// Parse and validate a feed body.
///
/// # Errors
///
/// Returns an error if the body is not JSON or not a valid feed.
pub fn parse_feed(body: &str) -> Result<FeatureCollection, QuakemapError> {
    let feed: FeatureCollection = serde_json::from_str(body)?;

    // Validate response structure
    feed.validate()?;

    debug!("parsed {} events", feed.features.len());
    Ok(feed)
}
