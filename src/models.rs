use serde::{Deserialize, Serialize};

/// A validated conversion request. `amount` is finite and strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionQuery {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl ConversionQuery {
    /// Amount as sent to the provider: two decimals, rounded on the exact
    /// binary value with exact ties going to even. Anything finer than a
    /// cent is lost here.
    pub fn formatted_amount(&self) -> String {
        format!("{:.2}", self.amount)
    }
}

/// Fields shared by every provider response. Only `result` is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderMeta {
    pub result: String,

    #[serde(default)]
    pub documentation: String,

    #[serde(default)]
    pub terms_of_use: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_last_update_unix: Option<i64>,

    #[serde(default)]
    pub time_last_update_utc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_next_update_unix: Option<i64>,

    #[serde(default)]
    pub time_next_update_utc: String,

    // Only present on failures, e.g. "unsupported-code".
    #[serde(rename = "error-type", default, skip_serializing)]
    pub error_type: Option<String>,
}

/// Response of the provider's `codes` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodesResult {
    #[serde(flatten)]
    pub meta: ProviderMeta,

    /// `(code, display name)` pairs in provider order.
    #[serde(default)]
    pub supported_codes: Vec<(String, String)>,
}

/// Response of the provider's `pair` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionResult {
    #[serde(flatten)]
    pub meta: ProviderMeta,

    #[serde(default)]
    pub base_code: String,

    #[serde(default)]
    pub target_code: String,

    #[serde(default)]
    pub conversion_rate: f64,

    #[serde(default)]
    pub conversion_result: f64,
}
