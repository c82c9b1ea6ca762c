//! One batch run: load, check, aggregate, write

use crate::config::Config;
use crate::error::RunError;
use crate::output::{write_error_log, write_json, StagedList};
use crate::proxy::grouping::{group_by_country, group_by_country_and_provider};
use crate::proxy::models::{AliveProxy, CheckOutcome, CheckResult};
use crate::proxy::{CandidateParser, CheckerConfig, ProxyChecker};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Check outcomes split into what the writers need
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Alive proxies in input-list order
    pub alive_by_input: Vec<AliveProxy>,
    /// Alive proxies in the order their checks completed
    pub alive_by_completion: Vec<AliveProxy>,
    /// Dead reasons in the order their checks completed
    pub dead_reasons: Vec<String>,
}

impl Aggregation {
    /// Split outcomes that arrive in completion order
    pub fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let mut aggregation = Self::default();
        let mut indexed = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                CheckResult::Alive(proxy) => {
                    aggregation.alive_by_completion.push(proxy.clone());
                    indexed.push((outcome.index, proxy));
                }
                CheckResult::Dead { reason } => aggregation.dead_reasons.push(reason),
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        aggregation.alive_by_input = indexed.into_iter().map(|(_, proxy)| proxy).collect();

        aggregation
    }
}

/// What a run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Candidates loaded from the input list
    pub total: usize,
    pub alive: usize,
    pub dead: usize,
    /// Artifacts written successfully, in write order
    pub written: Vec<PathBuf>,
    /// Messages for artifacts that could not be written
    pub failures: Vec<String>,
}

impl RunSummary {
    fn new(started_at: DateTime<Utc>, aggregation: &Aggregation) -> Self {
        let alive = aggregation.alive_by_input.len();
        let dead = aggregation.dead_reasons.len();
        Self {
            started_at,
            finished_at: started_at,
            total: alive + dead,
            alive,
            dead,
            written: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record a best-effort write; failures are logged and kept, not raised
    fn record(&mut self, path: PathBuf, result: std::result::Result<(), RunError>) {
        match result {
            Ok(()) => self.written.push(path),
            Err(e) => {
                warn!("{}", e);
                self.failures.push(e.to_string());
            }
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run one batch with `config`
///
/// A missing input list aborts before any request is made. Failing to stage
/// or replace the input list aborts before the grouped artifacts are written;
/// every other write failure is recorded in the summary.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let started_at = Utc::now();

    let candidates = CandidateParser::parse_file(&config.ip_file)?;
    info!(
        "Processing {} candidates from {}",
        candidates.len(),
        config.ip_file.display()
    );

    let checker_config = CheckerConfig::new()
        .with_api_url(config.api_url.clone())
        .with_concurrency(config.concurrency)
        .with_timeout(config.timeout);
    let checker = ProxyChecker::with_config(checker_config).context("failed to build HTTP client")?;

    let outcomes = checker.check_candidates(candidates).await;
    let aggregation = Aggregation::from_outcomes(outcomes);
    info!(
        alive = aggregation.alive_by_input.len(),
        dead = aggregation.dead_reasons.len(),
        "all checks finished"
    );

    let mut summary = RunSummary::new(started_at, &aggregation);

    let staged = StagedList::stage(&config.ip_file, &aggregation.alive_by_input)
        .context("failed to stage the alive proxy list")?;

    if let Err(e) = fs::create_dir_all(&config.output_dir) {
        warn!(
            "failed to create output directory {}: {}",
            config.output_dir.display(),
            e
        );
    }

    if !aggregation.dead_reasons.is_empty() {
        let path = config.error_log_path();
        let result = write_error_log(&path, &aggregation.dead_reasons);
        summary.record(path, result);
    }

    staged
        .commit(&config.ip_file)
        .context("failed to replace the input list")?;
    summary.written.push(config.ip_file.clone());

    let path = config.grouped_by_cc_and_isp_path();
    let result = write_json(
        &path,
        &group_by_country_and_provider(&aggregation.alive_by_completion),
    );
    summary.record(path, result);

    let path = config.grouped_by_cc_path();
    let result = write_json(&path, &group_by_country(&aggregation.alive_by_completion));
    summary.record(path, result);

    summary.finished_at = Utc::now();
    Ok(summary)
}
