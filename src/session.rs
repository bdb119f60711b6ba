//! Explicit session shared by entity instances: one transport plus the API prefix.

use crate::auth::AuthInfo;
use crate::config::{Config, DEFAULT_PREFIX};
use crate::error::TxResult;
use crate::http::{ReqwestBackend, Transport};
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// Cheap to clone; clones share the same transport.
#[derive(Debug, Clone)]
pub struct Session {
    transport: Arc<Transport>,
    prefix: Arc<str>,
}

impl Session {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport: Arc::new(transport),
            prefix: Arc::from(DEFAULT_PREFIX),
        }
    }

    /// Builds auth, backend and transport from a [`Config`].
    pub fn from_config(config: &Config) -> TxResult<Self> {
        Self::from_config_with_headers(config, HeaderMap::new())
    }

    /// Like [`Session::from_config`], with custom headers sent on every request.
    pub fn from_config_with_headers(config: &Config, headers: HeaderMap) -> TxResult<Self> {
        let auth = AuthInfo::from_parts(
            config.username.as_deref(),
            config.password.as_deref(),
            headers,
        )?;
        let backend = Arc::new(ReqwestBackend::new(config.timeout)?);
        let transport =
            Transport::with_backend(&config.hostname, auth, backend)?.verbose(config.verbose);
        tracing::debug!("Session for {} with prefix {}", transport.hostname(), config.prefix);
        Ok(Self::new(transport).with_prefix(&config.prefix))
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Arc::from(prefix);
        self
    }

    /// Swaps the credentials used by every entity sharing this session.
    pub fn set_auth(&self, auth: AuthInfo) {
        self.transport.set_auth(auth);
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
