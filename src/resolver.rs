//! Route resolution.
//!
//! Maps request paths to filesystem paths through an ordered prefix table.
//! Resolution is pure: no filesystem access, no async. Existence and type
//! checks belong to the caller.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-request resolution failures, answered as 404 by the handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No route prefix matches the request path.
    #[error("no route matches the request path")]
    NoRoute,

    /// The path does not percent-decode to valid UTF-8, or contains NUL.
    #[error("request path is not valid percent-encoded UTF-8")]
    InvalidEncoding,
}

/// One lookup rule: requests whose decoded path starts with `prefix` are
/// served from `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub prefix: String,
    pub root: PathBuf,
}

impl Route {
    pub fn new(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
        }
    }
}

/// Ordered sequence of routes, fixed for the server's lifetime.
///
/// Declaration order is match order: the first prefix that matches wins. An
/// empty prefix matches every path and belongs last as the catch-all.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Find the first route whose prefix is a literal prefix of `path`.
    ///
    /// The match is a plain character-prefix test, not segment-aware:
    /// `/media` also matches `/mediafoo`.
    #[must_use]
    pub fn match_route(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| path.starts_with(&route.prefix))
    }

    /// Resolve a request path, as received on the wire, to a filesystem path.
    ///
    /// Strips any query string and fragment, percent-decodes, picks the first
    /// matching route, and joins the remaining path segments onto the route's
    /// root. Empty, `.` and `..` segments are discarded outright, so the
    /// result is always a descendant of (or equal to) the matched root.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, ResolveError> {
        let stripped = strip_query_and_fragment(request_path);
        let decoded = percent_decode_str(stripped)
            .decode_utf8()
            .map_err(|_| ResolveError::InvalidEncoding)?;
        if decoded.contains('\0') {
            return Err(ResolveError::InvalidEncoding);
        }

        let route = self.match_route(&decoded).ok_or(ResolveError::NoRoute)?;
        let remainder = &decoded[route.prefix.len()..];
        Ok(join_segments(&route.root, remainder))
    }
}

/// Cut the `?query` and `#fragment` suffixes, in that order.
fn strip_query_and_fragment(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    path.split('#').next().unwrap_or(path)
}

/// Append each surviving segment of `remainder` to `root`.
///
/// `.` and `..` are dropped, not resolved, so no segment sequence can climb
/// out of `root`.
fn join_segments(root: &Path, remainder: &str) -> PathBuf {
    let mut resolved = root.to_path_buf();
    for segment in remainder.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        resolved.push(segment);
    }
    resolved
}
