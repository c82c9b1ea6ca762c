//! Validation API request template and response decoding

use crate::error::CheckError;
use crate::proxy::models::Candidate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Matches the `{ip}` and `{port}` placeholders of a URL template
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(ip|port)\}").expect("Invalid placeholder regex"));

/// URL template for the validation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTemplate {
    template: String,
}

impl ApiTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute the candidate into every placeholder
    pub fn render(&self, candidate: &Candidate) -> String {
        PLACEHOLDER_REGEX
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "ip" => candidate.ip.clone(),
                _ => candidate.port.clone(),
            })
            .into_owned()
    }
}

/// First element of the validation response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiRecord {
    #[serde(default)]
    pub proxyip: Value,
    #[serde(default, rename = "countryCode", deserialize_with = "lenient_string")]
    pub country_code: Option<String>,
    #[serde(default, rename = "asOrganization", deserialize_with = "lenient_string")]
    pub as_organization: Option<String>,
}

impl ApiRecord {
    /// Decode a response body: a JSON array whose first element is an object
    pub fn from_body(target: &str, body: &str) -> Result<Self, CheckError> {
        let values: Vec<Value> =
            serde_json::from_str(body).map_err(|e| CheckError::parse(target, e))?;
        let first = values
            .into_iter()
            .next()
            .ok_or_else(|| CheckError::parse(target, "response array is empty"))?;

        serde_json::from_value(first).map_err(|e| CheckError::parse(target, e))
    }

    pub fn is_alive(&self) -> bool {
        is_truthy(&self.proxyip)
    }
}

/// Truthiness of a loosely typed JSON flag
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Keep string values, treat anything else as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}
