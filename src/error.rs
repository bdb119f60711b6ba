//! Error types and HTTP status mapping.

use reqwest::StatusCode;
use thiserror::Error;

/// Local errors about field names, raised before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{entity} requires URL attribute \"{field}\"")]
    MissingUrlField { entity: &'static str, field: String },

    #[error("{entity} has no URL attribute \"{field}\"")]
    UnknownUrlField { entity: &'static str, field: String },

    #[error("{entity} has no readable attribute \"{field}\"")]
    Unreadable { entity: &'static str, field: String },

    #[error("{entity} attribute \"{field}\" is a URL attribute and cannot be changed")]
    UrlFieldImmutable { entity: &'static str, field: String },

    #[error("{entity} has no writable attribute \"{field}\"")]
    NotWritable { entity: &'static str, field: String },

    #[error("{entity} attribute \"{field}\" cannot hold binary data")]
    BinaryNotAllowed { entity: &'static str, field: String },

    #[error("no value for placeholder \"{name}\" in path template \"{template}\"")]
    MissingPlaceholder { template: String, name: String },
}

/// Classification of a [`TxError`], for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Field,
    Config,
    /// 400
    Request,
    /// 401
    Authorization,
    /// 403
    Authentication,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 5xx
    RemoteServer,
    /// Any other unsuccessful status.
    Unknown,
    NoResponse,
    Decode,
}

/// Errors returned by the client.
#[derive(Error, Debug)]
pub enum TxError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("bad request: {body}")]
    Request { status: u16, body: String },

    #[error("authorization required: {body}")]
    Authorization { status: u16, body: String },

    #[error("authentication error: {body}")]
    Authentication { status: u16, body: String },

    #[error("entity not found: {body}")]
    NotFound { status: u16, body: String },

    #[error("conflict: {body}")]
    Conflict { status: u16, body: String },

    #[error("remote server error ({status}): {body}")]
    RemoteServer { status: u16, body: String },

    #[error("unknown error ({status}): {body}")]
    Unknown { status: u16, body: String },

    #[error("no response from {url}: {reason}")]
    NoResponse { url: String, reason: String },

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl TxError {
    /// Builds the error for an unsuccessful response, keeping the raw body as message.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        let status = status.as_u16();
        match status {
            400 => TxError::Request { status, body },
            401 => TxError::Authorization { status, body },
            403 => TxError::Authentication { status, body },
            404 => TxError::NotFound { status, body },
            409 => TxError::Conflict { status, body },
            500..=599 => TxError::RemoteServer { status, body },
            _ => TxError::Unknown { status, body },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TxError::Field(_) => ErrorKind::Field,
            TxError::Config(_) => ErrorKind::Config,
            TxError::Request { .. } => ErrorKind::Request,
            TxError::Authorization { .. } => ErrorKind::Authorization,
            TxError::Authentication { .. } => ErrorKind::Authentication,
            TxError::NotFound { .. } => ErrorKind::NotFound,
            TxError::Conflict { .. } => ErrorKind::Conflict,
            TxError::RemoteServer { .. } => ErrorKind::RemoteServer,
            TxError::Unknown { .. } => ErrorKind::Unknown,
            TxError::NoResponse { .. } => ErrorKind::NoResponse,
            TxError::Decode(_) | TxError::Utf8(_) | TxError::UnexpectedResponse(_) => {
                ErrorKind::Decode
            }
        }
    }

    /// HTTP status of the response that caused the error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TxError::Request { status, .. }
            | TxError::Authorization { status, .. }
            | TxError::Authentication { status, .. }
            | TxError::NotFound { status, .. }
            | TxError::Conflict { status, .. }
            | TxError::RemoteServer { status, .. }
            | TxError::Unknown { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body for status-derived errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            TxError::Request { body, .. }
            | TxError::Authorization { body, .. }
            | TxError::Authentication { body, .. }
            | TxError::NotFound { body, .. }
            | TxError::Conflict { body, .. }
            | TxError::RemoteServer { body, .. }
            | TxError::Unknown { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type TxResult<T> = Result<T, TxError>;
