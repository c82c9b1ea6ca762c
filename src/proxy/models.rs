//! Proxy data models

use std::fmt;

/// A proxy read from the input list, waiting to be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub ip: String,
    pub port: String,
}

impl Candidate {
    /// Create a candidate, trimming surrounding whitespace
    pub fn new(ip: &str, port: &str) -> Self {
        Self {
            ip: ip.trim().to_string(),
            port: port.trim().to_string(),
        }
    }

    /// Get the candidate in IP:PORT format
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// A proxy confirmed alive, with the metadata reported by the check API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliveProxy {
    pub ip: String,
    pub port: String,
    pub country_code: Option<String>,
    pub provider_name: Option<String>,
}

impl AliveProxy {
    pub fn new(
        candidate: &Candidate,
        country_code: Option<String>,
        provider_name: Option<String>,
    ) -> Self {
        Self {
            ip: candidate.ip.clone(),
            port: candidate.port.clone(),
            country_code,
            provider_name,
        }
    }

    /// Get the proxy in IP:PORT format
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// Terminal state of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Alive(AliveProxy),
    /// Confirmed dead or failed to check; only the message tells them apart
    Dead { reason: String },
}

impl CheckResult {
    pub fn dead(reason: impl ToString) -> Self {
        Self::Dead {
            reason: reason.to_string(),
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, CheckResult::Alive(_))
    }

    pub fn alive_proxy(&self) -> Option<&AliveProxy> {
        match self {
            CheckResult::Alive(proxy) => Some(proxy),
            CheckResult::Dead { .. } => None,
        }
    }

    pub fn dead_reason(&self) -> Option<&str> {
        match self {
            CheckResult::Alive(_) => None,
            CheckResult::Dead { reason } => Some(reason),
        }
    }
}

/// A check result tied back to the input line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Zero-based position of the candidate in the input list
    pub index: usize,
    pub candidate: Candidate,
    pub result: CheckResult,
}

impl CheckOutcome {
    pub fn new(index: usize, candidate: Candidate, result: CheckResult) -> Self {
        Self {
            index,
            candidate,
            result,
        }
    }
}
