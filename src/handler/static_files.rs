//! Static file serving module
//!
//! Probes the resolved filesystem path and serves file bytes, an index
//! file, or a directory listing. Read failures map to responses per the
//! conventional static-server contract: missing is 404, anything else 500.

use crate::handler::listing;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Index files tried, in order, when the resolved path is a directory.
const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Serve whatever the resolved path points at.
pub async fn serve_resolved(
    resolved: &Path,
    request_path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(resolved).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat '{}': {e}",
                resolved.display()
            ));
            return http::build_500_response();
        }
    };

    if metadata.is_dir() {
        serve_directory(resolved, request_path, is_head).await
    } else {
        serve_file(resolved, is_head).await
    }
}

/// Serve a directory: index file if present, HTML listing otherwise.
async fn serve_directory(dir: &Path, request_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    if let Some(index) = find_index_file(dir).await {
        return serve_file(&index, is_head).await;
    }

    match listing::render(dir, request_path).await {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_500_response()
        }
    }
}

/// Serve a single file's full byte content.
async fn serve_file(path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => {
            let content_type =
                mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            http::build_file_response(content, content_type, is_head)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// First index file that exists as a regular file under `dir`.
async fn find_index_file(dir: &Path) -> Option<PathBuf> {
    for index in INDEX_FILES {
        let candidate = dir.join(index);
        if let Ok(meta) = fs::metadata(&candidate).await {
            if meta.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
