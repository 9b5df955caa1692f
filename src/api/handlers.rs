use super::AppState;
use super::models::{ApiData, ConvertParams, HealthStatus, SuccessEnvelope};
use crate::errors::{ApiError, UpstreamError};
use crate::models::ConversionQuery;
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;

const SERVICE_NAME: &str = "Currency Converter API";

/// GET /api/health — liveness check, never touches the provider
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE_NAME,
    })
}

/// GET /api/currencies — every currency code the provider supports
pub async fn get_currencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessEnvelope>, ApiError> {
    tracing::info!("listing supported currencies");

    let codes = state.provider.supported_codes().await.map_err(|e| {
        let err = match &e {
            UpstreamError::Transport(_) => ApiError::Fetch,
            UpstreamError::Read(_) => ApiError::Read,
            UpstreamError::Parse(_) => ApiError::Parse,
            UpstreamError::Provider { .. } => ApiError::Api,
        };
        tracing::error!(
            "[{}] currency list failed ({}): {}",
            state.provider.name(),
            err.code(),
            e
        );
        err
    })?;

    let count = codes.supported_codes.len();
    tracing::info!("fetched {} currencies", count);

    Ok(Json(SuccessEnvelope::new(
        ApiData::Codes(codes),
        format!("Successfully fetched {count} currencies"),
    )))
}

/// GET /api/convert?from=&to=&amount= — converts through the provider
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SuccessEnvelope>, ApiError> {
    let query = validate(ConvertParams::from_pairs(pairs))?;
    tracing::info!("converting {} {} to {}", query.amount, query.from, query.to);

    let result = state.provider.convert(&query).await.map_err(|e| {
        let err = match &e {
            UpstreamError::Transport(_) => ApiError::Conversion,
            UpstreamError::Read(_) => ApiError::Read,
            UpstreamError::Parse(_) => ApiError::Parse,
            UpstreamError::Provider { .. } => ApiError::ConversionFailed,
        };
        tracing::error!(
            "[{}] conversion {}->{} failed ({}): {}",
            state.provider.name(),
            query.from,
            query.to,
            err.code(),
            e
        );
        err
    })?;

    tracing::info!(
        "converted {:.2} {} = {:.2} {} (rate: {:.4})",
        query.amount,
        query.from,
        result.conversion_result,
        query.to,
        result.conversion_rate
    );

    let message = format!(
        "Conversion successful: {:.2} {} = {:.2} {}",
        query.amount, query.from, result.conversion_result, query.to
    );
    Ok(Json(SuccessEnvelope::new(ApiData::Conversion(result), message)))
}

/// Checks caller input before anything goes upstream.
fn validate(params: ConvertParams) -> Result<ConversionQuery, ApiError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    let (Some(from), Some(to), Some(raw_amount)) = (
        non_empty(params.from),
        non_empty(params.to),
        non_empty(params.amount),
    ) else {
        tracing::warn!("convert called with missing parameters");
        return Err(ApiError::MissingParameters);
    };

    let amount = match raw_amount.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::warn!("invalid amount: {:?}", raw_amount);
            return Err(ApiError::InvalidAmount("The amount entered is not valid"));
        }
    };

    if amount <= 0.0 {
        tracing::warn!("amount must be positive: {}", amount);
        return Err(ApiError::InvalidAmount("Amount must be greater than 0"));
    }

    Ok(ConversionQuery { from, to, amount })
}
