use crate::errors::UpstreamError;
use crate::models::{CodesResult, ConversionResult, ProviderMeta};
use serde::de::DeserializeOwned;

const SUCCESS: &str = "success";

/// Implemented by every provider response shape so the decoder can check
/// the provider's own status field.
pub trait ProviderResponse: DeserializeOwned {
    fn meta(&self) -> &ProviderMeta;
}

impl ProviderResponse for CodesResult {
    fn meta(&self) -> &ProviderMeta {
        &self.meta
    }
}

impl ProviderResponse for ConversionResult {
    fn meta(&self) -> &ProviderMeta {
        &self.meta
    }
}

/// Parses a provider body. Malformed JSON or a missing `result` field is a
/// `Parse` error; a well-formed body whose `result` is not `"success"` is a
/// `Provider` error.
pub fn decode<T: ProviderResponse>(body: &[u8]) -> Result<T, UpstreamError> {
    let parsed: T = serde_json::from_slice(body)?;

    let meta = parsed.meta();
    if meta.result != SUCCESS {
        return Err(UpstreamError::Provider {
            result: meta.result.clone(),
            error_type: meta.error_type.clone(),
        });
    }

    Ok(parsed)
}
