use super::RateProvider;
use super::decoder;
use crate::config::{ApiKey, Config};
use crate::errors::{ConfigError, UpstreamError};
use crate::models::{CodesResult, ConversionQuery, ConversionResult};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};

/// Raw provider reply, before decoding.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Client for exchangerate-api.com style providers:
/// `{base}/{key}/codes` and `{base}/{key}/pair/{from}/{to}/{amount}`.
pub struct ExchangeRateApi {
    client: reqwest::Client,
    api_key: ApiKey,
    convert_base: Url,
    codes_base: Url,
}

impl ExchangeRateApi {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            convert_base: parse_base("EXCHANGE_API_CONVERT_URL", &config.convert_base_url)?,
            codes_base: parse_base("EXCHANGE_API_CODES_URL", &config.codes_base_url)?,
        })
    }

    pub fn codes_url(&self) -> Url {
        join(&self.codes_base, &[self.api_key.expose(), "codes"])
    }

    pub fn convert_url(&self, query: &ConversionQuery) -> Url {
        let amount = query.formatted_amount();
        join(
            &self.convert_base,
            &[
                self.api_key.expose(),
                "pair",
                query.from.as_str(),
                query.to.as_str(),
                amount.as_str(),
            ],
        )
    }

    /// Issues a GET and reads the whole body. Non-2xx statuses are not
    /// errors here: the provider reports its failures as JSON bodies.
    pub async fn fetch(&self, url: Url) -> Result<RawResponse, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(UpstreamError::read)?.to_vec();

        Ok(RawResponse { status, body })
    }
}

fn parse_base(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Appends path segments, percent-encoding each one so caller input such
/// as `USD/../codes` stays a single segment.
fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[async_trait]
impl RateProvider for ExchangeRateApi {
    fn name(&self) -> &'static str {
        "exchangerate-api"
    }

    async fn supported_codes(&self) -> Result<CodesResult, UpstreamError> {
        let raw = self.fetch(self.codes_url()).await?;
        tracing::debug!("[{}] codes replied {}", self.name(), raw.status);
        decoder::decode(&raw.body)
    }

    async fn convert(&self, query: &ConversionQuery) -> Result<ConversionResult, UpstreamError> {
        let raw = self.fetch(self.convert_url(query)).await?;
        tracing::debug!(
            "[{}] pair {}->{} replied {}",
            self.name(),
            query.from,
            query.to,
            raw.status
        );
        decoder::decode(&raw.body)
    }
}
