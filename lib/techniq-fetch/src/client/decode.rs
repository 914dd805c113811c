use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::FetchError;

/// How object keys of a payload are rewritten before decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Rewrites object keys to `snake_case`, so `targetSkills` and
    /// `target_skills` both decode into a Rust field named `target_skills`.
    ///
    /// Keys already in `snake_case` are kept, digits stay attached to the
    /// previous word (`player2Name` becomes `player2_name`). Every object is
    /// rewritten, including maps keyed by data: `{"Wall Passing": 3}` decodes as
    /// `{"wall_passing": 3}`. Use [`KeyStrategy::Verbatim`] for such payloads.
    #[default]
    SnakeCase,

    /// Keeps keys as received.
    Verbatim,
}

/// JSON decoder shared by all the calls of an executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    key_strategy: KeyStrategy,
}

impl Decoder {
    /// A decoder applying the given key strategy.
    pub fn new(key_strategy: KeyStrategy) -> Self {
        Self { key_strategy }
    }

    /// The key strategy in use.
    pub fn key_strategy(&self) -> KeyStrategy {
        self.key_strategy
    }

    /// Decodes a response body into `T`.
    ///
    /// An empty (or blank) body decodes as JSON `null`, so `Option<_>` and `()`
    /// succeed while shapes that require content fail with [`FetchError::NoData`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DecodingError`] with the JSON path of the mismatch when
    /// the payload is malformed or does not fit `T`.
    pub fn decode<T>(&self, body: &[u8]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        if body.iter().all(u8::is_ascii_whitespace) {
            return T::deserialize(Value::Null).map_err(|_| FetchError::NoData);
        }

        let value = serde_json::from_slice::<Value>(body).map_err(|err| {
            debug!(%err, "malformed JSON payload");
            FetchError::decoding(format!("malformed payload: {err}"))
        })?;

        let value = match self.key_strategy {
            KeyStrategy::SnakeCase => snake_case_keys(value),
            KeyStrategy::Verbatim => value,
        };

        serde_path_to_error::deserialize(value).map_err(|err| {
            let path = err.path().to_string();
            let description = format!("at '{path}': {}", err.inner());
            debug!(%path, error = %err.inner(), "payload does not match the result shape");
            FetchError::decoding(description)
        })
    }
}

fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (snake_case_key(key), snake_case_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(snake_case_keys).collect()),
        other => other,
    }
}

fn snake_case_key(key: String) -> String {
    if !key.contains(|ch: char| ch.is_ascii_uppercase() || ch == '-' || ch == ' ') {
        return key;
    }
    if key.contains(['-', ' ']) {
        use cruet::*;
        return key.to_snake_case();
    }

    // camelCase or PascalCase, split before an uppercase letter that follows a
    // lowercase letter or a digit, or that ends an acronym (`userIDToken`)
    let mut result = String::with_capacity(key.len() + 4);
    let mut chars = key.chars().peekable();
    let mut previous = None::<char>;
    while let Some(current) = chars.next() {
        if current.is_ascii_uppercase() {
            let after_word = previous.is_some_and(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit());
            let acronym_end = previous.is_some_and(|ch| ch.is_ascii_uppercase())
                && chars.peek().is_some_and(char::is_ascii_lowercase);
            if (after_word || acronym_end) && !result.ends_with('_') {
                result.push('_');
            }
            result.push(current.to_ascii_lowercase());
        } else {
            result.push(current);
        }
        previous = Some(current);
    }
    result
}
