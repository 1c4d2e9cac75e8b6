pub mod data_brokers;
pub mod endpoints;
pub mod query;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AlphaError, Result};

/// Body format requested through the `datatype` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Csv,
    Json,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown response format: {}", other)),
        }
    }
}

/// Body of a successful call, exactly as upstream sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Csv(String),
    Json(Value),
}

/// Reported when a bulk request was cut down to the upstream symbol limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub requested: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub function: &'static str,
    pub payload: Payload,
    pub truncation: Option<Truncation>,
}

impl Response {
    pub fn format(&self) -> ResponseFormat {
        match self.payload {
            Payload::Csv(_) => ResponseFormat::Csv,
            Payload::Json(_) => ResponseFormat::Json,
        }
    }

    /// Raw CSV text, if this was a CSV call.
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Csv(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Json(value) => Some(value),
            Payload::Csv(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self.payload {
            Payload::Json(value) => Some(value),
            Payload::Csv(_) => None,
        }
    }

    /// Decodes a CSV payload into header-keyed rows. JSON payloads yield `None`.
    pub fn csv_records(&self) -> Option<Result<Vec<CsvRecord>>> {
        self.as_text().map(decode_csv)
    }

    pub fn was_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

/// One CSV row keyed by the header row, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvRecord {
    fields: Vec<(String, String)>,
}

impl CsvRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Decodes CSV text into rows keyed by its header row.
pub fn decode_csv(text: &str) -> Result<Vec<CsvRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        // Short rows keep only the columns they have.
        let row = headers
            .iter()
            .zip(record.iter())
            .collect::<CsvRecord>();
        rows.push(row);
    }
    Ok(rows)
}

pub(crate) fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(AlphaError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_two_rows() {
        let rows = decode_csv("a,b\n1,2\n3,4").unwrap();
        let expected = vec![
            [("a", "1"), ("b", "2")].into_iter().collect::<CsvRecord>(),
            [("a", "3"), ("b", "4")].into_iter().collect::<CsvRecord>(),
        ];
        assert_eq!(rows, expected);
        assert_eq!(rows[1].get("b"), Some("4"));
    }

    #[test]
    fn test_decode_keeps_header_order() {
        let rows = decode_csv("timestamp,open,close\r\n2024-01-02,10.5,11\r\n").unwrap();
        let columns: Vec<&str> = rows[0].columns().collect();
        assert_eq!(columns, vec!["timestamp", "open", "close"]);
    }

    #[test]
    fn test_decode_empty_and_header_only() {
        assert!(decode_csv("").unwrap().is_empty());
        assert!(decode_csv("a,b\n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_quoted_fields() {
        let rows = decode_csv("symbol,name\nTSCO.LON,\"Tesco, PLC\"\n").unwrap();
        assert_eq!(rows[0].get("name"), Some("Tesco, PLC"));
    }

    #[test]
    fn test_response_accessors() {
        let csv = Response {
            function: "TIME_SERIES_DAILY",
            payload: Payload::Csv("a,b\n1,2".to_string()),
            truncation: None,
        };
        assert_eq!(csv.format(), ResponseFormat::Csv);
        assert_eq!(csv.as_text(), Some("a,b\n1,2"));
        assert!(csv.as_json().is_none());
        assert_eq!(csv.csv_records().unwrap().unwrap().len(), 1);

        let json = Response {
            function: "OVERVIEW",
            payload: Payload::Json(json!({"Symbol": "IBM"})),
            truncation: None,
        };
        assert!(json.csv_records().is_none());
        assert_eq!(json.into_json(), Some(json!({"Symbol": "IBM"})));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ResponseFormat>(), Ok(ResponseFormat::Csv));
        assert_eq!(" json ".parse::<ResponseFormat>(), Ok(ResponseFormat::Json));
        assert!("xml".parse::<ResponseFormat>().is_err());
    }
}
