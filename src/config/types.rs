use serde::Deserialize;

/// Default catalog root; item hrefs on catalog pages are relative to it
pub const DEFAULT_ROOT_URL: &str = "https://books.toscrape.com/catalogue/";

/// Default worker-pool width (pages in flight at once)
pub const DEFAULT_WORKERS: usize = 25;

/// Default persisted output file name
pub const DEFAULT_OUTPUT_FILE: &str = "books_data.txt";

/// Main configuration structure for Shelf-Sweep
///
/// Every section and key is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub schedule: ScheduleConfig,
}

/// Catalog location and crawl width
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL that catalog pages (`page-<n>.html`) and item hrefs resolve against
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Maximum number of catalog pages processed concurrently
    pub workers: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("shelf-sweep/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the JSON dump, placed next to the executable
    #[serde(rename = "file-name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

/// Daily schedule configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily run, `HH:MM`
    #[serde(rename = "start-time")]
    pub start_time: String,

    /// How often the schedule is checked, in seconds
    #[serde(rename = "poll-interval-secs")]
    pub poll_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_time: "19:00".to_string(),
            poll_interval_secs: 60,
        }
    }
}
