//! Proxy checker module for validating candidates against the check API

use crate::config::{DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use crate::error::CheckError;
use crate::proxy::api::{ApiRecord, ApiTemplate};
use crate::proxy::models::{AliveProxy, Candidate, CheckOutcome, CheckResult};
use crate::Result;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Configuration for proxy checker
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Timeout for each validation request
    pub timeout: Duration,
    /// Number of concurrent checks
    pub concurrency: usize,
    /// Validation URL template with `{ip}` and `{port}` placeholders
    pub api_url: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }
}

/// Proxy checker backed by the remote validation API
#[derive(Clone)]
pub struct ProxyChecker {
    config: CheckerConfig,
    template: ApiTemplate,
    client: Client,
}

impl ProxyChecker {
    /// Create a new proxy checker with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CheckerConfig::default())
    }

    /// Create a new proxy checker with custom configuration
    pub fn with_config(mut config: CheckerConfig) -> Result<Self> {
        config.concurrency = config.concurrency.max(1);
        let client = Client::builder().timeout(config.timeout).build()?;
        let template = ApiTemplate::new(config.api_url.clone());

        Ok(Self {
            config,
            template,
            client,
        })
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a single candidate, logging one progress line for the outcome
    pub async fn check_candidate(&self, candidate: &Candidate) -> CheckResult {
        let result = match self.query(candidate).await {
            Ok(record) if record.is_alive() => CheckResult::Alive(AliveProxy::new(
                candidate,
                record.country_code,
                record.as_organization,
            )),
            Ok(_) => CheckResult::dead(CheckError::NotAlive {
                target: candidate.address(),
            }),
            Err(e) => CheckResult::dead(e),
        };

        match &result {
            CheckResult::Alive(_) => info!("{} is ALIVE", candidate),
            CheckResult::Dead { reason } => warn!("{}", reason),
        }

        result
    }

    /// Check every candidate with bounded concurrency
    ///
    /// Outcomes come back in completion order; each one keeps the input
    /// index of its candidate. Returns only after every check is terminal.
    pub async fn check_candidates(&self, candidates: Vec<Candidate>) -> Vec<CheckOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));

        stream::iter(candidates.into_iter().enumerate())
            .map(|(index, candidate)| {
                let sem = Arc::clone(&semaphore);
                let checker = self.clone();
                async move {
                    // never closed
                    let _permit = sem.acquire().await.ok();
                    let result = checker.check_candidate(&candidate).await;
                    CheckOutcome::new(index, candidate, result)
                }
            })
            .buffer_unordered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await
    }

    /// Issue the validation request and decode the first response record
    async fn query(&self, candidate: &Candidate) -> std::result::Result<ApiRecord, CheckError> {
        let target = candidate.address();
        let url = self.template.render(candidate);
        debug!(%url, "checking {}", target);

        let request = async {
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.config.timeout, request).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) if e.is_timeout() => {
                return Err(CheckError::Timeout {
                    target,
                    timeout: self.config.timeout,
                })
            }
            Ok(Err(e)) => return Err(CheckError::Transport { target, source: e }),
            Err(_) => {
                return Err(CheckError::Timeout {
                    target,
                    timeout: self.config.timeout,
                })
            }
        };

        if !status.is_success() {
            return Err(CheckError::HttpStatus { target, status });
        }

        ApiRecord::from_body(&target, &body)
    }
}
