//! Fetches USD exchange rates from the quote service.
//!
//! The service answers `GET <endpoint>?currency=USD` with:
//! `{ "data": { "currency": "USD", "rates": { "BTC": "0.0000157", ... } } }`
//!
//! Rates are kept as strings here. They are only parsed into decimals for the
//! symbols we actually distribute to, so an odd rate for an unrelated symbol
//! doesn't fail the whole run.

use crate::distribution::Symbol;

use reqwest::{blocking, StatusCode};
use serde::Deserialize;
use std::{collections::HashMap, time::Duration};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.coinbase.com/v2/exchange-rates";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// All rates are expressed relative to this currency.
pub const QUOTE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The request couldn't be sent, or the response couldn't be read.
    #[error("failed to request rates: {reason}")]
    Network { reason: String },

    /// The service didn't answer before the deadline.
    #[error("request for rates timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("request failed status={status} message={body}")]
    HttpStatus { status: u16, body: String },

    /// The body isn't JSON, or doesn't have the expected shape.
    #[error("failed to unmarshal response body: {reason}")]
    ResponseParse { reason: String },

    #[error("invalid response data rates do not exist")]
    MissingRates,
}

/// Exchange rates for one quote currency, as returned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    /// The quote currency echoed back by the service.
    pub currency: String,

    /// Units of each symbol one unit of the quote currency buys.
    pub rates: HashMap<Symbol, String>,
}

/// Anything that can give us a rate table.
pub trait RateSource {
    fn fetch_rates(&self) -> Result<RateTable, Error>;
}

/// Blocking HTTP client for the quote service.
/// It sends exactly one request per call: no retries, no caching.
pub struct QuoteClient {
    client: blocking::Client,
    endpoint: String,
    timeout: Duration,
}

impl QuoteClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        Self::with_builder(blocking::Client::builder(), endpoint, timeout)
    }

    // The timeout covers the whole request: connecting, sending, and reading
    // the body.
    pub fn with_builder(
        builder: blocking::ClientBuilder,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = builder
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Network {
                reason: err.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                after: self.timeout,
            }
        } else {
            Error::Network {
                reason: err.to_string(),
            }
        }
    }
}

impl RateSource for QuoteClient {
    fn fetch_rates(&self) -> Result<RateTable, Error> {
        tracing::debug!(endpoint = %self.endpoint, timeout = ?self.timeout, "requesting rates");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("currency", QUOTE_CURRENCY)])
            .send()
            .map_err(|err| self.request_error(err))?;

        let status = response.status();
        let body = response.bytes().map_err(|err| self.request_error(err))?;
        tracing::debug!(%status, bytes = body.len(), "received rates");

        decode(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    data: Option<RatesData>,
}

// A missing field and a null field mean the same thing to us.
#[derive(Debug, Deserialize)]
struct RatesData {
    currency: Option<String>,
    rates: Option<HashMap<Symbol, String>>,
}

/// Turn the raw response into a rate table.
///
/// An empty `rates` object is valid. A missing one isn't.
pub fn decode(status: StatusCode, body: &[u8]) -> Result<RateTable, Error> {
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    let response: RatesResponse =
        serde_json::from_slice(body).map_err(|err| Error::ResponseParse {
            reason: err.to_string(),
        })?;

    let data = response.data.ok_or(Error::MissingRates)?;
    let rates = data.rates.ok_or(Error::MissingRates)?;

    Ok(RateTable {
        currency: data.currency.unwrap_or_default(),
        rates,
    })
}

#[cfg(test)]
mod decode_tests {
    use super::{decode, Error, RateTable};

    use reqwest::StatusCode;
    use std::collections::HashMap;

    #[test]
    fn test_decode_ok() {
        let body = br#"{"data":{"currency":"USD","rates":{"BTC":"0.0000157","ETH":"0.00041","USD":"1.0"}}}"#;

        let got = decode(StatusCode::OK, body).unwrap();

        assert_eq!("USD", got.currency);
        assert_eq!(3, got.rates.len());
        assert_eq!("0.0000157", got.rates["BTC"]);
        assert_eq!("0.00041", got.rates["ETH"]);
    }

    #[test]
    fn test_decode_empty_rates_is_valid() {
        let got = decode(StatusCode::OK, br#"{"data":{"currency":"USD","rates":{}}}"#);

        assert_eq!(
            Ok(RateTable {
                currency: "USD".to_string(),
                rates: HashMap::new(),
            }),
            got
        );
    }

    #[test]
    // Whether data or rates are absent or null, there are no rates.
    fn test_decode_missing_rates() {
        for body in vec![
            r#"{}"#,
            r#"{"data":null}"#,
            r#"{"data":{}}"#,
            r#"{"data":{"currency":"USD"}}"#,
            r#"{"data":{"currency":"USD","rates":null}}"#,
            r#"{"errors":[{"id":"not_found","message":"Invalid currency"}]}"#,
        ] {
            assert_eq!(
                Err(Error::MissingRates),
                decode(StatusCode::OK, body.as_bytes()),
                "{}",
                body
            );
        }
    }

    #[test]
    fn test_decode_malformed() {
        for body in vec![
            "",
            "not json",
            r#"{"data":{"rates":{"BTC":"0.1"}"#,
            r#"{"data":{"rates":["BTC"]}}"#,
            r#"{"data":{"rates":{"BTC":0.1}}}"#,
            "42",
        ] {
            match decode(StatusCode::OK, body.as_bytes()) {
                Err(Error::ResponseParse { .. }) => {}
                other => panic!("unexpected result for {:?}: {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_decode_http_status() {
        for (status, body) in vec![
            (StatusCode::NOT_FOUND, "not found"),
            (StatusCode::TOO_MANY_REQUESTS, "slow down"),
            (StatusCode::INTERNAL_SERVER_ERROR, ""),
        ] {
            let got = decode(status, body.as_bytes());
            assert_eq!(
                Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body: body.to_string(),
                }),
                got
            );
        }
    }

    #[test]
    // A non-2xx status fails even if the body looks fine.
    fn test_decode_http_status_before_body() {
        let body = r#"{"data":{"currency":"USD","rates":{}}}"#;
        let got = decode(StatusCode::BAD_GATEWAY, body.as_bytes());

        assert_eq!(
            "request failed status=502 message={\"data\":{\"currency\":\"USD\",\"rates\":{}}}",
            got.unwrap_err().to_string()
        );
    }
}
