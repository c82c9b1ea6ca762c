//! Proxy module for loading, checking and grouping proxies
//!
//! This module provides functionality for:
//! - Parsing candidate proxies from the comma-separated input list
//! - Checking candidates against the validation API with bounded concurrency
//! - Grouping alive proxies by country code and provider

pub mod api;
pub mod checker;
pub mod grouping;
pub mod models;
pub mod parser;

pub use api::{ApiRecord, ApiTemplate};
pub use checker::{CheckerConfig, ProxyChecker};
pub use grouping::{
    group_by_country, group_by_country_and_provider, GroupedByCountry,
    GroupedByCountryAndProvider, LetterCode, ProviderGroup,
};
pub use models::{AliveProxy, Candidate, CheckOutcome, CheckResult};
pub use parser::CandidateParser;
