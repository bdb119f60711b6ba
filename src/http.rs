//! HTTP transport: URL resolution, auth injection, JSON/multipart bodies, status mapping.

use crate::auth::AuthInfo;
use crate::error::{TxError, TxResult};
use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SCHEME: &str = "https";

/// Name of the multipart part carrying binary content.
pub const FILE_PART: &str = "file";

/// Request body handed to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Map<String, Value>),
    /// Form fields plus one file part named [`FILE_PART`].
    Multipart {
        fields: Vec<(String, String)>,
        file: Bytes,
    },
}

/// A fully resolved request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

/// Status and raw bytes of a response, whatever the status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Connectivity failure: no response was received at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoResponse(pub String);

/// Performs one request over the network.
pub trait HttpBackend: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NoResponse>;
}

/// Blocking `reqwest` backend.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::blocking::Client,
}

impl ReqwestBackend {
    pub fn new(timeout: Option<Duration>) -> TxResult<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TxError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpBackend for ReqwestBackend {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NoResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart { fields, file } => {
                let mut form = reqwest::blocking::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                let part = reqwest::blocking::multipart::Part::bytes(file.to_vec())
                    .file_name(FILE_PART);
                builder.multipart(form.part(FILE_PART, part))
            }
        };

        let response = builder.send().map_err(|e| NoResponse(e.to_string()))?;
        let status = response.status();
        let body = response.bytes().map_err(|e| NoResponse(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// One handle per remote host.
///
/// Clones share the auth strategy, so [`Transport::set_auth`] reaches every
/// session and entity holding this transport.
#[derive(Clone)]
pub struct Transport {
    hostname: Url,
    auth: Arc<RwLock<AuthInfo>>,
    backend: Arc<dyn HttpBackend>,
    verbose: bool,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("hostname", &self.hostname.as_str())
            .field("auth", &*self.auth.read())
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Transport over a default [`ReqwestBackend`].
    pub fn new(hostname: &str, auth: AuthInfo) -> TxResult<Self> {
        Self::with_backend(hostname, auth, Arc::new(ReqwestBackend::new(None)?))
    }

    pub fn with_backend(
        hostname: &str,
        auth: AuthInfo,
        backend: Arc<dyn HttpBackend>,
    ) -> TxResult<Self> {
        let hostname = full_hostname(hostname)?;
        Ok(Self {
            hostname,
            auth: Arc::new(RwLock::new(auth)),
            backend,
            verbose: false,
        })
    }

    /// Log request and response bodies at trace level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn hostname(&self) -> &str {
        self.hostname.as_str()
    }

    pub fn auth(&self) -> AuthInfo {
        self.auth.read().clone()
    }

    /// Replaces the auth strategy for all later requests.
    pub fn set_auth(&self, auth: AuthInfo) {
        tracing::debug!("Auth for {} replaced", self.hostname);
        *self.auth.write() = auth;
    }

    /// GET `path` and decode the body as JSON.
    pub fn get(&self, path: &str, params: &[(String, String)]) -> TxResult<Value> {
        let text = self.make_request(Method::GET, path, params, RequestBody::Empty)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn post(
        &self,
        path: &str,
        data: Map<String, Value>,
        content: Option<Bytes>,
    ) -> TxResult<String> {
        self.send(Method::POST, path, data, content)
    }

    pub fn put(
        &self,
        path: &str,
        data: Map<String, Value>,
        content: Option<Bytes>,
    ) -> TxResult<String> {
        self.send(Method::PUT, path, data, content)
    }

    pub fn delete(&self, path: &str) -> TxResult<String> {
        self.make_request(Method::DELETE, path, &[], RequestBody::Empty)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        data: Map<String, Value>,
        content: Option<Bytes>,
    ) -> TxResult<String> {
        let body = match content {
            None => RequestBody::Json(data),
            Some(file) => RequestBody::Multipart {
                fields: form_fields(data),
                file,
            },
        };
        self.make_request(method, path, &[], body)
    }

    fn full_url(&self, path: &str) -> TxResult<Url> {
        self.hostname
            .join(path)
            .map_err(|e| TxError::Config(format!("invalid path {path}: {e}")))
    }

    fn make_request(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: RequestBody,
    ) -> TxResult<String> {
        let url = self.full_url(path)?;
        tracing::debug!("{} {}", method, url);
        if self.verbose {
            tracing::trace!("Request body: {:?}", body);
        }

        let mut headers = HeaderMap::new();
        self.auth.read().populate(&mut headers)?;

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers,
            query: params.to_vec(),
            body,
        };
        let response = self.backend.execute(request).map_err(|NoResponse(reason)| {
            tracing::error!("No response from URL {}: {}", url, reason);
            TxError::NoResponse {
                url: url.to_string(),
                reason,
            }
        })?;

        require_success(response, self.verbose)
    }
}

/// Returns the UTF-8 body of a 2xx response; otherwise the error for its status.
fn require_success(response: HttpResponse, verbose: bool) -> TxResult<String> {
    let status = response.status;
    if status.is_success() {
        tracing::debug!("Request was successful ({})", status);
        let text = String::from_utf8(response.body.to_vec())?;
        if verbose {
            tracing::trace!("Response body: {}", text);
        }
        return Ok(text);
    }
    let body = String::from_utf8_lossy(&response.body).into_owned();
    tracing::debug!("Response was {}: {}", status, body);
    Err(TxError::from_status(status, body))
}

/// Adds a scheme when the host has none; only http and https are accepted.
fn full_hostname(hostname: &str) -> TxResult<Url> {
    let full = if hostname.starts_with("http://") || hostname.starts_with("https://") {
        hostname.to_string()
    } else if let Some((protocol, _)) = hostname.split_once("://") {
        return Err(TxError::Config(format!(
            "protocol {protocol} is not supported"
        )));
    } else {
        format!("{DEFAULT_SCHEME}://{hostname}")
    };
    Url::parse(&full).map_err(|e| TxError::Config(format!("invalid hostname {hostname}: {e}")))
}

/// Multipart form fields: strings verbatim, anything else JSON-encoded.
fn form_fields(data: Map<String, Value>) -> Vec<(String, String)> {
    data.into_iter()
        .map(|(name, value)| match value {
            Value::String(s) => (name, s),
            other => (name, other.to_string()),
        })
        .collect()
}
