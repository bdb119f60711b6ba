//! Authentication strategies applied to every outgoing request.

use crate::error::{TxError, TxResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Credentials plus custom headers; immutable once built.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    credentials: Credentials,
    headers: HeaderMap,
}

impl Default for AuthInfo {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl AuthInfo {
    pub fn anonymous() -> Self {
        Self {
            credentials: Credentials::Anonymous,
            headers: HeaderMap::new(),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::Basic {
                username: username.into(),
                password: password.into(),
            },
            headers: HeaderMap::new(),
        }
    }

    /// Picks the strategy from the arguments given.
    ///
    /// Both username and password → basic auth; neither → anonymous. Empty
    /// strings count as absent. Exactly one of them is a configuration error.
    pub fn from_parts(
        username: Option<&str>,
        password: Option<&str>,
        headers: HeaderMap,
    ) -> TxResult<Self> {
        let username = username.filter(|u| !u.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let auth = match (username, password) {
            (Some(username), Some(password)) => Self::basic(username, password),
            (None, None) => Self::anonymous(),
            (None, Some(_)) => {
                return Err(TxError::Config("username must have a value".to_string()))
            }
            (Some(_), None) => {
                return Err(TxError::Config("password must have a value".to_string()))
            }
        };
        Ok(auth.with_headers(headers))
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_anonymous(&self) -> bool {
        self.credentials == Credentials::Anonymous
    }

    /// Adds the `Authorization` header for basic auth, then the custom headers.
    ///
    /// A custom header replaces any earlier value of the same name, including
    /// `Authorization`; every value of a multi-valued custom header is kept.
    pub fn populate(&self, headers: &mut HeaderMap) -> TxResult<()> {
        if let Credentials::Basic { username, password } = &self.credentials {
            let token = STANDARD.encode(format!("{username}:{password}"));
            let mut value = HeaderValue::from_str(&format!("Basic {token}"))
                .map_err(|e| TxError::Config(format!("invalid authorization header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        for name in self.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &self.headers {
            headers.append(name.clone(), value.clone());
        }
        Ok(())
    }
}
