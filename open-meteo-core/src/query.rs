use std::fmt;
use url::Url;

use crate::config::{ClientConfig, base_url};
use crate::error::Result;

/// The API paths this client knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Forecast,
    Geocoding,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Forecast => "/v1/forecast",
            Endpoint::Geocoding => "/v1/search",
        }
    }

    pub fn host<'a>(&self, config: &'a ClientConfig) -> &'a str {
        match self {
            Endpoint::Forecast => &config.forecast_host,
            Endpoint::Geocoding => &config.geocoding_host,
        }
    }

    /// Full request URL for `params`, query string percent-encoded.
    pub fn url(&self, config: &ClientConfig, params: &QueryParams) -> Result<Url> {
        let mut url = base_url(self.host(config))?;

        // Keep any path prefix of the host (e.g. a reverse proxy mount point).
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{}", self.path()));
        url.set_query(None);
        params.encode_into(&mut url);

        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Ordered query parameters of one request.
///
/// Setting a key twice replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Like [`QueryParams::with`], but skipped when `value` is `None`.
    pub fn with_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
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

    /// Append every pair to the query string of `url`.
    pub fn encode_into(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.iter());
    }

    /// Decode the query string of `url`.
    pub fn from_url(url: &Url) -> Self {
        url.query_pairs()
            .fold(Self::new(), |params, (k, v)| params.with(k.into_owned(), v))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |params, (k, v)| params.with(k, v))
    }
}
