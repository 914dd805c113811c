use std::fmt;

use http::HeaderValue;
use http::header::{AUTHORIZATION, HeaderName};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::FetchError;

/// Secure wrapper for credentials that zeroes its memory on drop.
///
/// The value is never displayed in full: `Display` masks it and `Debug` redacts it.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Takes ownership of the secret.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner value.
    ///
    /// The returned reference should not be stored for extended periods.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn mask_sensitive(value: &str) -> String {
        let chars = value.chars().collect::<Vec<_>>();
        match (chars.get(..4), chars.len().checked_sub(4).and_then(|start| chars.get(start..))) {
            (Some(head), Some(tail)) if chars.len() > 8 => {
                format!("{}...{}", head.iter().collect::<String>(), tail.iter().collect::<String>())
            }
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Credentials added to every request of an executor.
///
/// The backend functions expect the identity token of the signed-in user as a
/// bearer token. The token itself comes from the authentication SDK of the host
/// application.
///
/// # Examples
///
/// ```rust
/// use techniq_fetch::Authentication;
///
/// let auth = Authentication::Bearer("id-token".into());
///
/// let auth = Authentication::ApiKey {
///     header_name: "x-api-key".to_string(),
///     key: "secret-key".into(),
/// };
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum Authentication {
    /// Adds `Authorization: Bearer <token>`.
    Bearer(SecureString),

    /// Adds `<header_name>: <key>`.
    ApiKey {
        /// The header name for the API key.
        header_name: String,
        /// The API key value.
        key: SecureString,
    },
}

impl Authentication {
    /// Converts the credentials into a sensitive HTTP header.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] if the header name or value
    /// contains characters not allowed in HTTP headers.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), FetchError> {
        let (name, value) = match self {
            Self::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|err| invalid_credentials("bearer token", &err))?;
                (AUTHORIZATION, value)
            }
            Self::ApiKey { header_name, key } => {
                let name = HeaderName::from_bytes(header_name.as_bytes())
                    .map_err(|err| invalid_credentials("API key header name", &err))?;
                let value = HeaderValue::from_str(key.as_str())
                    .map_err(|err| invalid_credentials("API key", &err))?;
                (name, value)
            }
        };

        let mut value = value;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

fn invalid_credentials(what: &str, err: &dyn std::error::Error) -> FetchError {
    debug!(%err, "{what} is not a valid header");
    FetchError::ConfigurationError
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => f.debug_tuple("Bearer").field(token).finish(),
            Self::ApiKey { header_name, key } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", key)
                .finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
            Self::ApiKey { header_name, key } => write!(f, "{header_name}: {key}"),
        }
    }
}
