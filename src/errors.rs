use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

/// Failures while talking to the exchange-rate provider.
///
/// `reqwest` errors are stored with their URL stripped, since the URL
/// carries the provider key.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("failed to read response body: {0}")]
    Read(reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("provider reported {result:?} ({})", .error_type.as_deref().unwrap_or("no error-type"))]
    Provider {
        result: String,
        error_type: Option<String>,
    },
}

impl UpstreamError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    pub fn read(err: reqwest::Error) -> Self {
        Self::Read(err.without_url())
    }
}

/// Client-facing failures. Each variant maps to one error code and status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Failed to fetch currency list from the provider")]
    Fetch,

    #[error("Failed to read data from the provider")]
    Read,

    #[error("Failed to process provider data")]
    Parse,

    #[error("Provider failed to return the currency list")]
    Api,

    #[error("Parameters from, to and amount are required")]
    MissingParameters,

    #[error("{0}")]
    InvalidAmount(&'static str),

    #[error("Failed to convert currency")]
    Conversion,

    #[error("Currency conversion failed, check the currency codes")]
    ConversionFailed,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Fetch => "FETCH_ERROR",
            ApiError::Read => "READ_ERROR",
            ApiError::Parse => "PARSE_ERROR",
            ApiError::Api => "API_ERROR",
            ApiError::MissingParameters => "MISSING_PARAMETERS",
            ApiError::InvalidAmount(_) => "INVALID_AMOUNT",
            ApiError::Conversion => "CONVERSION_ERROR",
            ApiError::ConversionFailed => "CONVERSION_FAILED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Fetch | ApiError::Read | ApiError::Parse | ApiError::Conversion => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Api
            | ApiError::MissingParameters
            | ApiError::InvalidAmount(_)
            | ApiError::ConversionFailed => StatusCode::BAD_REQUEST,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
