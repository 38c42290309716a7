// Tabular data source: fetches a published sheet and decodes it into a grid.
//
// The trait is the seam between the app loop and the network so tests can
// feed grids directly. The HTTP implementation downloads the CSV export of a
// published spreadsheet and keeps every row, header or not; header detection
// happens later in the pipeline.

use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::FetchConfig;
use crate::table::Grid;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// The sheet could not be retrieved. There is no partial-data recovery: any
/// of these aborts the current view load.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("CSV error in {url}: {source}")]
    Csv { url: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Fetch the sheet at `url` as rows of text cells.
    async fn fetch_grid(&self, url: &str) -> Result<Grid, SourceError>;
}

// ---------------------------------------------------------------------------
// CSV decoding
// ---------------------------------------------------------------------------

/// Decode CSV text into a grid. No row is treated as a header, rows may have
/// different lengths, and blank lines are dropped.
pub fn parse_grid<R: Read>(rdr: R) -> Result<Grid, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);

    let mut grid: Grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Append a `t=<unix millis>` parameter so CDN caches in front of published
/// sheets always serve a fresh export.
pub fn with_cache_buster(url: &str, millis: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={millis}")
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Fetches published-sheet CSV exports over HTTP.
pub struct HttpCsvSource {
    http: reqwest::Client,
    cache_bust: bool,
}

impl HttpCsvSource {
    pub fn new(timeout: Duration, cache_bust: bool) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, cache_bust })
    }

    pub fn from_config(fetch: &FetchConfig) -> Result<Self, reqwest::Error> {
        Self::new(Duration::from_secs(fetch.timeout_secs), fetch.cache_bust)
    }

    fn request_url(&self, url: &str) -> String {
        if self.cache_bust {
            with_cache_buster(url, chrono::Utc::now().timestamp_millis())
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl TabularSource for HttpCsvSource {
    async fn fetch_grid(&self, url: &str) -> Result<Grid, SourceError> {
        let request_url = self.request_url(url);
        debug!(url = %request_url, "fetching sheet");

        let http_err = |source: reqwest::Error| SourceError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(&request_url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(http_err)?;
        let grid = parse_grid(body.as_ref()).map_err(|source| SourceError::Csv {
            url: url.to_string(),
            source,
        })?;
        debug!(rows = grid.len(), "sheet decoded");
        Ok(grid)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
