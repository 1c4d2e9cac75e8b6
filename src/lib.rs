//! Client for the Alpha Vantage market data API.
//!
//! All upstream functions are described once in a static registry
//! ([`data::endpoints::ENDPOINTS`]) and dispatched through a single
//! [`AlphaVantage::call`].

pub mod config;
pub mod data;
pub mod errors;
pub mod utils;

pub use data::data_brokers::alphavantage::AlphaVantage;
pub use data::data_brokers::{HttpTransport, RawResponse, Transport};
pub use data::query::Params;
pub use data::{decode_csv, CsvRecord, Payload, Response, ResponseFormat, Truncation};
pub use errors::{AlphaError, Result};
