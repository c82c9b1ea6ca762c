//! Grouping of alive proxies by country code and provider
//!
//! Country keys are kept sorted. Within a country, providers are sorted
//! alphabetically and labelled `a`, `b`, `c`, ... in that order; proxy
//! lists keep the order in which the proxies were supplied.

use crate::proxy::models::AliveProxy;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Key used for proxies whose country code was not reported
pub const UNKNOWN_KEY: &str = "null";

/// Country code -> list of `ip:port`
pub type GroupedByCountry = BTreeMap<String, Vec<String>>;

/// Country code -> letter code -> provider group
pub type GroupedByCountryAndProvider = BTreeMap<String, BTreeMap<LetterCode, ProviderGroup>>;

/// Proxies of one provider inside one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderGroup {
    pub name: Option<String>,
    pub proxies: Vec<String>,
}

/// Zero-based provider position rendered as `a`..`z`, `aa`, `ab`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LetterCode(pub usize);

impl fmt::Display for LetterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut index = self.0;
        let mut letters = Vec::new();
        loop {
            letters.push((b'a' + (index % 26) as u8) as char);
            if index < 26 {
                break;
            }
            index = index / 26 - 1;
        }
        let code: String = letters.into_iter().rev().collect();
        f.write_str(&code)
    }
}

impl Serialize for LetterCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn country_key(proxy: &AliveProxy) -> String {
    proxy
        .country_code
        .clone()
        .unwrap_or_else(|| UNKNOWN_KEY.to_string())
}

/// Group proxies by country code only
pub fn group_by_country<'a, I>(proxies: I) -> GroupedByCountry
where
    I: IntoIterator<Item = &'a AliveProxy>,
{
    let mut grouped = GroupedByCountry::new();
    for proxy in proxies {
        grouped
            .entry(country_key(proxy))
            .or_default()
            .push(proxy.address());
    }
    grouped
}

/// Group proxies by country code, then by provider with letter codes
pub fn group_by_country_and_provider<'a, I>(proxies: I) -> GroupedByCountryAndProvider
where
    I: IntoIterator<Item = &'a AliveProxy>,
{
    // An absent provider sorts ahead of every named one
    let mut by_provider: BTreeMap<String, BTreeMap<Option<String>, Vec<String>>> = BTreeMap::new();
    for proxy in proxies {
        by_provider
            .entry(country_key(proxy))
            .or_default()
            .entry(proxy.provider_name.clone())
            .or_default()
            .push(proxy.address());
    }

    by_provider
        .into_iter()
        .map(|(country, providers)| {
            let lettered: BTreeMap<LetterCode, ProviderGroup> = providers
                .into_iter()
                .enumerate()
                .map(|(idx, (name, proxies))| (LetterCode(idx), ProviderGroup { name, proxies }))
                .collect();
            (country, lettered)
        })
        .collect()
}
