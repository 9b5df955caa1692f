use crate::errors::UpstreamError;
use crate::models::{CodesResult, ConversionQuery, ConversionResult};
use async_trait::async_trait;

pub mod client;
pub mod decoder;

pub use client::ExchangeRateApi;

#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lists every currency code the provider supports.
    async fn supported_codes(&self) -> Result<CodesResult, UpstreamError>;

    /// Converts `query.amount` from one currency to another at the
    /// provider's current rate.
    async fn convert(&self, query: &ConversionQuery) -> Result<ConversionResult, UpstreamError>;
}
