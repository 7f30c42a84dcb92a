//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution through the route table, and response dispatch. Every failure
//! is answered with a response; nothing here can take down the serving loop.

use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::server::ServerState;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<ServerState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let is_head = method == Method::HEAD;

    let response = match check_http_method(&method) {
        Some(resp) => resp,
        None => serve_path(&path, is_head, &state).await,
    };

    if state.access_log {
        let entry = access_entry(&req, &method, &path, query, peer_addr, &response);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return the response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Resolve the request path and serve the result.
async fn serve_path(
    path: &str,
    is_head: bool,
    state: &Arc<ServerState>,
) -> Response<Full<Bytes>> {
    match state.routes.resolve(path) {
        Ok(resolved) => static_files::serve_resolved(&resolved, path, is_head).await,
        Err(e) => {
            logger::log_warning(&format!("Resolution failed for '{path}': {e}"));
            http::build_404_response()
        }
    }
}

fn access_entry(
    req: &Request<hyper::body::Incoming>,
    method: &Method,
    path: &str,
    query: Option<String>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.to_string(),
        path.to_string(),
    );
    entry.query = query;
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0".to_string(),
        _ => "1.1".to_string(),
    };
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_value(req, "referer");
    entry.user_agent = header_value(req, "user-agent");
    entry
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
