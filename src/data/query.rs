use reqwest::Url;
use tracing::debug;

use super::endpoints::{EndpointDescriptor, Host};
use super::{ResponseFormat, Truncation};
use crate::errors::{AlphaError, Result};

/// Parameters the dispatcher always sets itself.
const RESERVED: &[&str] = &["function", "apikey", "datatype"];

/// Caller-supplied request parameters, in insertion order.
///
/// A name may appear more than once; every occurrence is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.pairs.push((name.into(), value.to_string()));
    }

    /// Adds the pair only when a value is present.
    pub fn with_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    /// First non-blank value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.all(name).find(|v| !v.trim().is_empty())
    }

    pub fn all<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + 'n
    where
        'a: 'n,
    {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Base URLs the two upstream hosts are reached at.
#[derive(Debug, Clone)]
pub struct Hosts {
    pub query_url: String,
    pub analytics_url: String,
}

/// A fully resolved request: the final query pairs in wire order.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub endpoint: &'static EndpointDescriptor,
    pub pairs: Vec<(String, String)>,
    pub truncation: Option<Truncation>,
}

impl PreparedQuery {
    /// Validates `params` against `endpoint` and fills in defaults.
    ///
    /// The API key is not part of the prepared pairs; it is appended by
    /// [`PreparedQuery::to_url`].
    pub fn prepare(
        endpoint: &'static EndpointDescriptor,
        params: &Params,
        format: ResponseFormat,
    ) -> Result<Self> {
        if !endpoint.supports(format) {
            return Err(AlphaError::UnsupportedFormat {
                function: endpoint.function.to_string(),
                format,
            });
        }

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut truncation = None;

        if endpoint.host == Host::Query {
            pairs.push(("function".to_string(), endpoint.function.to_string()));
        }

        for &name in endpoint.required {
            let values: Vec<&str> = params
                .all(name)
                .filter(|v| !v.trim().is_empty())
                .collect();
            if values.is_empty() {
                return Err(AlphaError::MissingParameter {
                    function: endpoint.function.to_string(),
                    parameter: name.to_string(),
                });
            }
            match endpoint.max_symbols {
                Some(limit) if name == "symbol" => {
                    // Every occurrence counts toward one list, in caller order.
                    let (joined, cut) = limit_symbols(&values, limit);
                    if joined.is_empty() {
                        return Err(AlphaError::MissingParameter {
                            function: endpoint.function.to_string(),
                            parameter: name.to_string(),
                        });
                    }
                    truncation = cut;
                    pairs.push((name.to_string(), joined));
                }
                _ => {
                    for value in values {
                        pairs.push((name.to_string(), value.to_string()));
                    }
                }
            }
        }

        for optional in endpoint.optional {
            let supplied: Vec<&str> = params
                .all(optional.name)
                .filter(|v| !v.trim().is_empty())
                .collect();
            if supplied.is_empty() {
                if let Some(default) = optional.default {
                    pairs.push((optional.name.to_string(), default.to_string()));
                }
            } else {
                for value in supplied {
                    pairs.push((optional.name.to_string(), value.to_string()));
                }
            }
        }

        for (name, value) in params.iter() {
            if RESERVED.contains(&name) || endpoint.is_known_param(name) {
                continue;
            }
            debug!("{}: passing through unrecognized parameter {}", endpoint.function, name);
            pairs.push((name.to_string(), value.to_string()));
        }

        if endpoint.sends_datatype() {
            pairs.push(("datatype".to_string(), format.as_str().to_string()));
        }

        Ok(Self {
            endpoint,
            pairs,
            truncation,
        })
    }

    /// Builds the request URL, percent-encoding every name and value.
    pub fn to_url(&self, hosts: &Hosts, api_key: &str) -> Result<Url> {
        let base = match self.endpoint.host {
            Host::Query => hosts.query_url.trim_end_matches('/').to_string(),
            Host::Analytics(path) => {
                format!("{}/{}", hosts.analytics_url.trim_end_matches('/'), path)
            }
        };

        let query = self
            .pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once(("apikey", api_key)))
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Url::parse(&format!("{}?{}", base, query))
            .map_err(|e| AlphaError::InvalidBaseUrl(format!("{}: {}", base, e)))
    }
}

/// Keeps the first `limit` non-blank entries across comma-separated lists.
fn limit_symbols(values: &[&str], limit: usize) -> (String, Option<Truncation>) {
    let symbols: Vec<&str> = values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let requested = symbols.len();
    let kept = requested.min(limit);
    let joined = symbols[..kept].join(",");
    let truncation = (requested > limit).then_some(Truncation { requested, kept });
    (joined, truncation)
}
