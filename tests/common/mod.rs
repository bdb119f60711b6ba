#![allow(dead_code)]

use mockall::mock;
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use std::sync::Arc;
use txlib::http::{HttpBackend, HttpRequest, HttpResponse, NoResponse, RequestBody};
use txlib::{AuthInfo, Session, Transport};

mock! {
    pub Backend {}

    impl HttpBackend for Backend {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NoResponse>;
    }
}

pub const HOST: &str = "http://doesntmatter.org";

pub fn session(backend: MockBackend) -> Session {
    session_with_auth(backend, AuthInfo::anonymous())
}

pub fn session_with_auth(backend: MockBackend, auth: AuthInfo) -> Session {
    let transport = Transport::with_backend(HOST, auth, Arc::new(backend)).unwrap();
    Session::new(transport)
}

pub fn respond(status: u16, body: &'static str) -> Result<HttpResponse, NoResponse> {
    Ok(HttpResponse::new(StatusCode::from_u16(status).unwrap(), body))
}

pub fn is(request: &HttpRequest, method: Method, path: &str) -> bool {
    request.method == method && request.url.path() == path
}

pub fn json_body(request: &HttpRequest) -> Option<&Map<String, Value>> {
    match &request.body {
        RequestBody::Json(body) => Some(body),
        _ => None,
    }
}

/// Expects one GET on `path` answered with `body`.
pub fn expect_get(backend: &mut MockBackend, path: &'static str, body: &'static str) {
    backend
        .expect_execute()
        .withf(move |req| is(req, Method::GET, path))
        .times(1)
        .returning(move |_| respond(200, body));
}
