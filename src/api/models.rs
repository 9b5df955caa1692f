use crate::models::{CodesResult, ConversionResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Payload carried by a success envelope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiData {
    Codes(CodesResult),
    Conversion(ConversionResult),
}

/// Body of every successful API response except health.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: ApiData,
    pub message: String,
}

impl SuccessEnvelope {
    pub fn new(data: ApiData, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

/// Response for GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub service: &'static str,
}

/// Raw query of GET /api/convert. Everything is optional here so that
/// missing parameters become our own error envelope, not an extractor
/// rejection.
#[derive(Debug, Default)]
pub struct ConvertParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

impl ConvertParams {
    /// Collects the known keys from decoded query pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut params.from,
                "to" => &mut params.to,
                "amount" => &mut params.amount,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let params = ConvertParams::from_pairs(pairs(&[
            ("from", "USD"),
            ("from", "EUR"),
            ("to", "JPY"),
            ("amount", "1"),
            ("amount", "2"),
        ]));
        assert_eq!(params.from.as_deref(), Some("USD"));
        assert_eq!(params.to.as_deref(), Some("JPY"));
        assert_eq!(params.amount.as_deref(), Some("1"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let params = ConvertParams::from_pairs(pairs(&[("foo", "bar"), ("to", "EUR")]));
        assert!(params.from.is_none());
        assert_eq!(params.to.as_deref(), Some("EUR"));
        assert!(params.amount.is_none());
    }
}
