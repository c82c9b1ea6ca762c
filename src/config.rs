//! Runtime configuration for a single batch run

use std::path::PathBuf;
use std::time::Duration;

/// Default input list, overridable with `IP_FILE`
pub const DEFAULT_IP_FILE: &str = "listproxy";

/// Default validation endpoint, overridable with `API_URL`
pub const DEFAULT_API_URL: &str = "https://proxyip-check.vercel.app/{ip}:{port}";

/// Default number of checks in flight at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Failure log written next to the grouped artifacts
pub const ERROR_LOG_FILE: &str = "error.txt";

/// Alive proxies grouped by country code, then provider
pub const GROUPED_BY_CC_AND_ISP_FILE: &str = "alive_proxies_grouped_by_cc_and_isp.json";

/// Alive proxies grouped by country code only
pub const GROUPED_BY_CC_FILE: &str = "alive_proxies_grouped_by_cc.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Candidate list; rewritten in place with the alive proxies
    pub ip_file: PathBuf,
    /// Validation URL template containing `{ip}` and `{port}`
    pub api_url: String,
    /// Directory receiving `error.txt` and the JSON artifacts
    pub output_dir: PathBuf,
    /// Maximum simultaneous validation requests
    pub concurrency: usize,
    /// Timeout applied to each validation request
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip_file: PathBuf::from(DEFAULT_IP_FILE),
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from("."),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ip_file = path.into();
        self
    }

    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.output_dir.join(ERROR_LOG_FILE)
    }

    pub fn grouped_by_cc_and_isp_path(&self) -> PathBuf {
        self.output_dir.join(GROUPED_BY_CC_AND_ISP_FILE)
    }

    pub fn grouped_by_cc_path(&self) -> PathBuf {
        self.output_dir.join(GROUPED_BY_CC_FILE)
    }
}
