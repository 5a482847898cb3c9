//! Route table for the stand-in service.
//!
//! Every response is a fixed descriptor registered under an exact
//! `(method, path)` key. Anything not registered gets the not-found entry.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use funnelwatch_common::HttpMethod;
use serde_json::json;

/// Body of a canned response.
#[derive(Debug, Clone)]
pub enum CannedBody {
    Html(&'static str),
    Json(serde_json::Value),
}

/// Fixed response returned for a registered route.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub body: CannedBody,
}

impl ResponseDescriptor {
    #[must_use]
    pub fn html(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body: CannedBody::Html(body),
        }
    }

    #[must_use]
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: CannedBody::Json(body),
        }
    }
}

impl IntoResponse for ResponseDescriptor {
    fn into_response(self) -> Response {
        let (content_type, bytes) = match self.body {
            CannedBody::Html(html) => ("text/html", html.as_bytes().to_vec()),
            CannedBody::Json(value) => ("application/json", value.to_string().into_bytes()),
        };
        let mut response = (self.status, bytes).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        response
    }
}

/// Exact-match lookup table keyed by `(method, path)`.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<(HttpMethod, String), ResponseDescriptor>,
    not_found: ResponseDescriptor,
}

impl RouteTable {
    #[must_use]
    pub fn new(not_found: ResponseDescriptor) -> Self {
        Self {
            routes: HashMap::new(),
            not_found,
        }
    }

    /// Register a route, replacing any previous descriptor for the same key.
    pub fn register(&mut self, method: HttpMethod, path: &str, response: ResponseDescriptor) {
        self.routes.insert((method, path.to_string()), response);
    }

    #[must_use]
    pub fn lookup(&self, method: HttpMethod, path: &str) -> &ResponseDescriptor {
        self.routes
            .get(&(method, path.to_string()))
            .unwrap_or(&self.not_found)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

/// Table answering every entry of the default probe set with its expected status.
#[must_use]
pub fn default_table() -> RouteTable {
    let mut table = RouteTable::new(ResponseDescriptor::json(
        StatusCode::NOT_FOUND,
        json!({ "error": "Not found" }),
    ));

    let pages = [
        ("/", "<html><body><h1>Stand-in Service</h1></body></html>"),
        ("/login", "<html><body><h1>Login Page</h1></body></html>"),
        ("/register", "<html><body><h1>Register Page</h1></body></html>"),
        (
            "/auth/forgot-password",
            "<html><body><h1>Forgot Password Page</h1></body></html>",
        ),
    ];
    for (path, html) in pages {
        table.register(HttpMethod::Get, path, ResponseDescriptor::html(StatusCode::OK, html));
    }

    table.register(
        HttpMethod::Get,
        "/api/health",
        ResponseDescriptor::json(
            StatusCode::OK,
            json!({ "status": "ok", "message": "Stand-in service is healthy" }),
        ),
    );
    table.register(
        HttpMethod::Get,
        "/api/products",
        ResponseDescriptor::json(
            StatusCode::OK,
            json!({ "products": [{ "id": 1, "name": "Test Product" }] }),
        ),
    );
    table.register(
        HttpMethod::Post,
        "/api/auth/login",
        ResponseDescriptor::json(
            StatusCode::OK,
            json!({ "success": true, "message": "Login successful" }),
        ),
    );
    table.register(
        HttpMethod::Post,
        "/api/auth/register",
        ResponseDescriptor::json(
            StatusCode::CREATED,
            json!({ "success": true, "message": "Registration successful" }),
        ),
    );
    table.register(
        HttpMethod::Post,
        "/api/auth/forgot-password",
        ResponseDescriptor::json(
            StatusCode::OK,
            json!({ "success": true, "message": "Password reset sent" }),
        ),
    );
    table.register(
        HttpMethod::Post,
        "/api/public/orders",
        ResponseDescriptor::json(StatusCode::OK, json!({ "success": true, "orderId": "stub-123" })),
    );

    table
}

/// Build the axum router serving `table` for every request.
pub fn build_router(table: RouteTable) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(Arc::new(table))
}

async fn dispatch(State(table): State<Arc<RouteTable>>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let descriptor = match to_probe_method(&method) {
        Some(m) => table.lookup(m, path).clone(),
        None => table.not_found.clone(),
    };
    tracing::debug!(%method, path, status = descriptor.status.as_u16(), "request served");
    descriptor.into_response()
}

fn to_probe_method(method: &Method) -> Option<HttpMethod> {
    match *method {
        Method::GET => Some(HttpMethod::Get),
        Method::POST => Some(HttpMethod::Post),
        _ => None,
    }
}
