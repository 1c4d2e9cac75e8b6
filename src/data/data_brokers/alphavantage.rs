//! Alpha Vantage dispatcher.
//!
//! Every upstream function goes through [`AlphaVantage::call`]: look up the
//! descriptor, validate and default the parameters, percent-encode the query,
//! issue one GET and normalise the body. The typed helpers further down are
//! thin shorthands over the same path.

use std::env;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use super::{HttpTransport, RawResponse, Transport};
use crate::config::ClientSettings;
use crate::data::endpoints::{self, EndpointDescriptor};
use crate::data::query::{Hosts, Params, PreparedQuery};
use crate::data::{parse_json, Payload, Response, ResponseFormat};
use crate::errors::{redact, AlphaError, Result};

pub const DEFAULT_QUERY_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_ANALYTICS_URL: &str = "https://alphavantageapi.co/timeseries";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const API_KEY_ENV: &str = "ALPHA_API_KEY";

/// Keys upstream uses to report a failed call inside a 200 response.
const ERROR_KEYS: &[&str] = &["Error Message", "Note"];
const INFORMATION_KEY: &str = "Information";

/// Alpha Vantage client. Holds no per-call state, so one instance can be shared
/// across tasks.
pub struct AlphaVantage<T: Transport = HttpTransport> {
    transport: T,
    api_key: String,
    hosts: Hosts,
    timeout: Duration,
}

impl AlphaVantage<HttpTransport> {
    /// Builds a client, falling back to `ALPHA_API_KEY` when no key is given.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_transport(HttpTransport::new(), api_key)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Ok(Self::new(settings.api_key.clone())?
            .with_hosts(&settings.base_url, &settings.analytics_url)
            .with_timeout(Duration::from_secs(settings.timeout_secs)))
    }
}

impl<T: Transport> AlphaVantage<T> {
    pub fn with_transport(transport: T, api_key: Option<String>) -> Result<Self> {
        let api_key = resolve_api_key(api_key)?;
        Ok(Self {
            transport,
            api_key,
            hosts: Hosts {
                query_url: DEFAULT_QUERY_URL.to_string(),
                analytics_url: DEFAULT_ANALYTICS_URL.to_string(),
            },
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_hosts(mut self, query_url: &str, analytics_url: &str) -> Self {
        self.hosts = Hosts {
            query_url: query_url.to_string(),
            analytics_url: analytics_url.to_string(),
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls `function` with `params`, using the client's default timeout.
    pub async fn call(
        &self,
        function: &str,
        params: Params,
        format: ResponseFormat,
    ) -> Result<Response> {
        self.call_with_timeout(function, params, format, self.timeout)
            .await
    }

    pub async fn call_with_timeout(
        &self,
        function: &str,
        params: Params,
        format: ResponseFormat,
        timeout: Duration,
    ) -> Result<Response> {
        let endpoint = endpoints::lookup(function)
            .ok_or_else(|| AlphaError::UnknownEndpoint(function.to_string()))?;
        let query = PreparedQuery::prepare(endpoint, &params, format)?;
        let url = query.to_url(&self.hosts, &self.api_key)?;

        if let Some(cut) = query.truncation {
            warn!(
                "{}: {} symbols requested, only the first {} were sent",
                endpoint.function, cut.requested, cut.kept
            );
        }
        debug!(
            "Alpha Vantage request: {}",
            redacted_url(&url, &self.api_key)
        );

        let raw = self
            .transport
            .get(&url, timeout)
            .await
            .map_err(|e| {
                let text = e.to_string();
                if text.contains(&self.api_key) {
                    AlphaError::Network(redact(&text, &self.api_key).into())
                } else {
                    AlphaError::Network(e)
                }
            })?;

        let payload = self.normalise(endpoint, format, raw)?;
        Ok(Response {
            function: endpoint.function,
            payload,
            truncation: query.truncation,
        })
    }

    fn normalise(
        &self,
        endpoint: &EndpointDescriptor,
        format: ResponseFormat,
        raw: RawResponse,
    ) -> Result<Payload> {
        if !raw.is_success() {
            return Err(AlphaError::UpstreamHttp {
                status: raw.status,
                body: redact(&raw.body, &self.api_key),
            });
        }

        match format {
            ResponseFormat::Json => {
                let value = parse_json(&raw.body)?;
                self.check_logical_error(endpoint, &value)?;
                Ok(Payload::Json(value))
            }
            ResponseFormat::Csv => {
                // Upstream answers CSV requests with a JSON object when they fail.
                if raw.body.trim_start().starts_with('{') {
                    if let Ok(value) = serde_json::from_str::<Value>(&raw.body) {
                        self.check_logical_error(endpoint, &value)?;
                    }
                }
                Ok(Payload::Csv(raw.body))
            }
        }
    }

    fn check_logical_error(&self, endpoint: &EndpointDescriptor, value: &Value) -> Result<()> {
        let Some(object) = value.as_object() else {
            return Ok(());
        };

        for key in ERROR_KEYS {
            if let Some(message) = object.get(*key) {
                return Err(AlphaError::UpstreamLogical {
                    message: redact(&message_text(message), &self.api_key),
                });
            }
        }

        if let Some(message) = object.get(INFORMATION_KEY) {
            let message = redact(&message_text(message), &self.api_key);
            if object.len() == 1 {
                return Err(AlphaError::UpstreamLogical { message });
            }
            warn!("{}: upstream information: {}", endpoint.function, message);
        }
        Ok(())
    }

    pub async fn intraday(
        &self,
        symbol: &str,
        interval: &str,
        format: ResponseFormat,
    ) -> Result<Response> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval);
        self.call("TIME_SERIES_INTRADAY", params, format).await
    }

    pub async fn daily(&self, symbol: &str, format: ResponseFormat) -> Result<Response> {
        self.call("TIME_SERIES_DAILY", Params::new().with("symbol", symbol), format)
            .await
    }

    pub async fn daily_adjusted(&self, symbol: &str, format: ResponseFormat) -> Result<Response> {
        let params = Params::new().with("symbol", symbol);
        self.call("TIME_SERIES_DAILY_ADJUSTED", params, format)
            .await
    }

    pub async fn weekly(&self, symbol: &str, format: ResponseFormat) -> Result<Response> {
        self.call("TIME_SERIES_WEEKLY", Params::new().with("symbol", symbol), format)
            .await
    }

    pub async fn monthly(&self, symbol: &str, format: ResponseFormat) -> Result<Response> {
        self.call("TIME_SERIES_MONTHLY", Params::new().with("symbol", symbol), format)
            .await
    }

    /// Live quotes for up to 100 symbols. Longer lists are cut to the first
    /// 100 and the response carries a [`Truncation`](crate::data::Truncation).
    pub async fn realtime_bulk_quotes(&self, symbols: &[&str]) -> Result<Response> {
        let params = Params::new().with("symbol", symbols.join(","));
        self.call("REALTIME_BULK_QUOTES", params, ResponseFormat::Json)
            .await
    }

    pub async fn symbol_search(&self, keywords: &str, format: ResponseFormat) -> Result<Response> {
        self.call("SYMBOL_SEARCH", Params::new().with("keywords", keywords), format)
            .await
    }

    pub async fn market_status(&self) -> Result<Response> {
        self.call("MARKET_STATUS", Params::new(), ResponseFormat::Json)
            .await
    }

    /// `limit` is only sent when it lies in `1..1000`; otherwise the upstream
    /// default applies.
    pub async fn news_sentiment(
        &self,
        tickers: Option<&str>,
        topics: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Response> {
        let params = Params::new()
            .with_opt("tickers", tickers)
            .with_opt("topics", topics)
            .with_opt("limit", news_limit(limit));
        self.call("NEWS_SENTIMENT", params, ResponseFormat::Json)
            .await
    }

    pub async fn company_overview(&self, symbol: &str) -> Result<Response> {
        self.call("OVERVIEW", Params::new().with("symbol", symbol), ResponseFormat::Json)
            .await
    }

    pub async fn currency_exchange_rate(&self, from: &str, to: &str) -> Result<Response> {
        let params = Params::new()
            .with("from_currency", from)
            .with("to_currency", to);
        self.call("CURRENCY_EXCHANGE_RATE", params, ResponseFormat::Json)
            .await
    }

    pub async fn fx_daily(&self, from: &str, to: &str, format: ResponseFormat) -> Result<Response> {
        let params = Params::new()
            .with("from_symbol", from)
            .with("to_symbol", to);
        self.call("FX_DAILY", params, format).await
    }

    pub async fn digital_currency_daily(
        &self,
        symbol: &str,
        market: &str,
        format: ResponseFormat,
    ) -> Result<Response> {
        let params = Params::new().with("symbol", symbol).with("market", market);
        self.call("DIGITAL_CURRENCY_DAILY", params, format).await
    }

    /// `commodity` is the upstream function name, e.g. `WTI` or `COFFEE`.
    pub async fn commodity(
        &self,
        commodity: &str,
        interval: Option<&str>,
        format: ResponseFormat,
    ) -> Result<Response> {
        let params = Params::new().with_opt("interval", interval);
        self.call(commodity, params, format).await
    }

    pub async fn economic_indicator(&self, indicator: &str, format: ResponseFormat) -> Result<Response> {
        self.call(indicator, Params::new(), format).await
    }

    /// Any technical indicator by name. Indicator-specific settings such as
    /// `time_period` go in `extra`; whatever is left out uses the defaults.
    pub async fn technical_indicator(
        &self,
        indicator: &str,
        symbol: &str,
        interval: &str,
        extra: Params,
        format: ResponseFormat,
    ) -> Result<Response> {
        let mut params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval);
        for (name, value) in extra.iter() {
            params.push(name, value);
        }
        self.call(indicator, params, format).await
    }

    /// Returns statistics over a fixed `[start, end]` window on the analytics host.
    pub async fn analytics_fixed_window(
        &self,
        symbols: &[&str],
        start: &str,
        end: &str,
        calculations: &[&str],
    ) -> Result<Response> {
        let params = analytics_params(symbols, start, end, calculations);
        self.call("ANALYTICS_FIXED_WINDOW", params, ResponseFormat::Json)
            .await
    }

    pub async fn analytics_sliding_window(
        &self,
        symbols: &[&str],
        start: &str,
        end: &str,
        calculations: &[&str],
        window_size: u32,
    ) -> Result<Response> {
        let params =
            analytics_params(symbols, start, end, calculations).with("WINDOW_SIZE", window_size);
        self.call("ANALYTICS_SLIDING_WINDOW", params, ResponseFormat::Json)
            .await
    }
}

fn analytics_params(symbols: &[&str], start: &str, end: &str, calculations: &[&str]) -> Params {
    Params::new()
        .with("SYMBOLS", symbols.join(","))
        .with("RANGE", start)
        .with("RANGE", end)
        .with("CALCULATIONS", calculations.join(","))
}

fn news_limit(limit: Option<u32>) -> Option<String> {
    limit
        .filter(|l| (1..1000).contains(l))
        .map(|l| l.to_string())
}

/// The request URL with the key masked in both raw and percent-encoded form.
fn redacted_url(url: &Url, api_key: &str) -> String {
    let masked = redact(url.as_str(), api_key);
    redact(&masked, &urlencoding::encode(api_key))
}

fn resolve_api_key(explicit: Option<String>) -> Result<String> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
        .ok_or(AlphaError::MissingApiKey)
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        assert_eq!(resolve_api_key(Some("abc".to_string())).unwrap(), "abc");
    }

    #[test]
    fn test_redacted_url_masks_encoded_key() {
        let key = "k&y/+=";
        let url = Url::parse(&format!(
            "https://www.alphavantage.co/query?function=MARKET_STATUS&apikey={}",
            urlencoding::encode(key)
        ))
        .unwrap();
        let logged = redacted_url(&url, key);
        assert!(!logged.contains(key));
        assert!(!logged.contains(&*urlencoding::encode(key)));
        assert!(logged.ends_with("apikey=***"));
    }

    #[test]
    fn test_news_limit_range() {
        assert_eq!(news_limit(None), None);
        assert_eq!(news_limit(Some(0)), None);
        assert_eq!(news_limit(Some(1)), Some("1".to_string()));
        assert_eq!(news_limit(Some(999)), Some("999".to_string()));
        assert_eq!(news_limit(Some(1000)), None);
    }

    #[test]
    fn test_message_text() {
        assert_eq!(message_text(&Value::String("x".to_string())), "x");
        assert_eq!(message_text(&serde_json::json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn test_analytics_params_order() {
        let params = analytics_params(&["AAPL", "IBM"], "2023-07-01", "2023-08-31", &["MEAN", "MAX"]);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("SYMBOLS", "AAPL,IBM"),
                ("RANGE", "2023-07-01"),
                ("RANGE", "2023-08-31"),
                ("CALCULATIONS", "MEAN,MAX"),
            ]
        );
    }
}
