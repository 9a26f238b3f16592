//! Per-request parameter dictionary.
//!
//! Filter parameters are namespaced (`irf__stock__gte`, `sf__name__iexact`, ...) so they never
//! look like lookups of the query layer. The helpers here build those names, pick the ones a
//! filter expects and strip the namespace again once a form has validated them.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Query parameters of one request. Repeated keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct QueryParams(BTreeMap<String, String>);

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (already split off) query string such as `a=1&b=2`.
    ///
    /// # Errors
    /// Returns the decoder error for malformed percent-encoding.
    pub fn parse(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(pairs.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The parameters a filter declared in its `expected_parameters`
    #[must_use]
    pub fn used_parameters(&self, expected: &[String]) -> BTreeMap<String, String> {
        expected
            .iter()
            .filter_map(|key| self.0.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    /// Copy of the dictionary without `keys`.
    ///
    /// A filter's form submits only its own inputs; everything returned here is carried along
    /// as hidden inputs so the other active filters survive the submission.
    #[must_use]
    pub fn without(&self, keys: &[String]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(key, _)| !keys.contains(*key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// URL-encoded form, without the leading `?`
    #[must_use]
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(&self.0).unwrap_or_default()
    }
}

/// Build a namespaced lookup parameter: `lookup_param("irf__", "stock", "gte")` is
/// `irf__stock__gte`.
#[must_use]
pub fn lookup_param(prefix: &str, field_path: &str, lookup: &str) -> String {
    format!("{prefix}{field_path}__{lookup}")
}

/// Strip `prefix` from every key that starts with it. Other keys pass through unchanged.
#[must_use]
pub fn clean_input_prefix<V>(prefix: &str, input: BTreeMap<String, V>) -> BTreeMap<String, V> {
    input
        .into_iter()
        .map(|(key, value)| match key.strip_prefix(prefix) {
            Some(stripped) => (stripped.to_string(), value),
            None => (key, value),
        })
        .collect()
}
