//! Address composition from a base address, a path and query parameters.

use std::fmt::Display;

use url::Url;

/// An ordered list of query parameters.
///
/// Parameters keep the insertion order and may repeat the same name.
/// Values are form-urlencoded when the address is built.
///
/// # Example
///
/// ```rust
/// use techniq_fetch::QueryParams;
///
/// let query = QueryParams::new()
///     .add_param("position", "midfielder")
///     .add_param("limit", 5);
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty list of query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, keeping the previous ones.
    pub fn add_param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a parameter in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Display) {
        self.0.push((name.into(), value.to_string()));
    }

    /// Whether no parameter was added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pairs, repeated names included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (name, value) in iter {
            result.push(name, value);
        }
        result
    }
}

/// A request target described as plain data.
///
/// The base address and the path are concatenated as-is, so the caller is
/// responsible for the separating `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    /// Scheme and host, with an optional path prefix.
    pub base_address: String,
    /// Appended to the base address as-is.
    pub path: String,
    /// Encoded after the path.
    pub query: QueryParams,
}

impl EndpointRequest {
    /// A request without query parameters.
    pub fn new(base_address: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
            path: path.into(),
            query: QueryParams::new(),
        }
    }

    /// Replaces the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.query.push(name, value);
        self
    }

    /// Composes the absolute address, see [`build_address`].
    pub fn address(&self) -> Option<Url> {
        build_address(&self.base_address, &self.path, &self.query)
    }
}

/// Composes an absolute address from a base address, a path and query parameters.
///
/// The base address and the path are concatenated then parsed. Query parameters
/// are appended in order, form-urlencoded. Returns `None` when the result is not
/// a valid absolute address with a host: empty input, missing scheme, whitespace,
/// invalid host or port.
///
/// This is a pure function, it never touches the network.
///
/// # Example
///
/// ```rust
/// use techniq_fetch::{QueryParams, build_address};
///
/// let query = QueryParams::new().add_param("q", "first touch");
/// let url = build_address("https://api.example.com", "/drills", &query);
/// assert_eq!(
///     url.map(String::from).as_deref(),
///     Some("https://api.example.com/drills?q=first+touch")
/// );
///
/// assert!(build_address("api.example.com", "/drills", &query).is_none());
/// ```
pub fn build_address(base_address: &str, path: &str, query: &QueryParams) -> Option<Url> {
    let raw = format!("{base_address}{path}");
    // `Url::parse` silently strips surrounding spaces and inner tabs or newlines
    if raw.chars().any(char::is_whitespace) {
        return None;
    }

    let mut url = Url::parse(&raw).ok()?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    if url.cannot_be_a_base() || !has_host {
        return None;
    }

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(name, value)| (name.as_str(), value.as_str())));
    }

    Some(url)
}
