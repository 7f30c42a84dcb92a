//! Lifecycle tests against a live server instance.
//!
//! Each test stages fixtures in a temp directory, binds an ephemeral port,
//! and drives the server over real HTTP.

use fixture_server::{Error, Route, RouteTable, ServeOptions, StaticServer};
use std::net::SocketAddr;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn stage(dir: &Path, name: &str, contents: &[u8]) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn catch_all(root: &Path) -> RouteTable {
    RouteTable::new(vec![Route::new("", root)])
}

fn start_server(table: RouteTable) -> StaticServer {
    let mut server = StaticServer::bind(0, table, ServeOptions::default()).expect("bind failed");
    server.start().expect("start failed");
    server
}

fn url(server: &StaticServer, path: &str) -> String {
    format!("http://127.0.0.1:{}{path}", server.port())
}

/// GET with a verbatim request target, bypassing client-side URL
/// normalization (reqwest collapses dot segments before sending).
async fn raw_get(addr: SocketAddr, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_staged_file_bytes_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = b"/* sample app bundle */\nwindow.MyRootApp = {};\n";
    stage(dir.path(), "app.js", bundle);

    let mut server = start_server(catch_all(dir.path()));
    let response = reqwest::get(url(&server, "/app.js")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/javascript");
    assert_eq!(response.bytes().await.unwrap().as_ref(), bundle);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn missing_file_answers_404() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = start_server(catch_all(dir.path()));

    let response = reqwest::get(url(&server, "/not-staged.js")).await.unwrap();
    assert_eq!(response.status(), 404);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn earliest_route_wins_over_catch_all() {
    let media = tempfile::tempdir().unwrap();
    let site = tempfile::tempdir().unwrap();
    stage(media.path(), "x.png", b"media-bytes");
    stage(site.path(), "other.png", b"site-bytes");

    let table = RouteTable::new(vec![
        Route::new("/media", media.path()),
        Route::new("", site.path()),
    ]);
    let mut server = start_server(table);

    let from_media = reqwest::get(url(&server, "/media/x.png")).await.unwrap();
    assert_eq!(from_media.bytes().await.unwrap().as_ref(), b"media-bytes");

    let from_site = reqwest::get(url(&server, "/other.png")).await.unwrap();
    assert_eq!(from_site.bytes().await.unwrap().as_ref(), b"site-bytes");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn directory_with_index_serves_it() {
    let dir = tempfile::tempdir().unwrap();
    stage(dir.path(), "index.html", b"<!DOCTYPE html><title>app</title>");

    let mut server = start_server(catch_all(dir.path()));
    let response = reqwest::get(url(&server, "/")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    assert!(response.text().await.unwrap().contains("<title>app</title>"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn directory_without_index_lists_entries() {
    let dir = tempfile::tempdir().unwrap();
    stage(dir.path(), "app.js", b"x");
    stage(dir.path(), "lib.global.js", b"x");

    let mut server = start_server(catch_all(dir.path()));
    let response = reqwest::get(url(&server, "/")).await.unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("app.js"));
    assert!(body.contains("lib.global.js"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn traversal_request_cannot_escape_the_root() {
    let outer = tempfile::tempdir().unwrap();
    stage(outer.path(), "secret.txt", b"outside the root");
    let public = outer.path().join("public");
    std::fs::create_dir(&public).unwrap();
    stage(&public, "app.js", b"inside the root");

    let mut server = start_server(catch_all(&public));
    let addr = SocketAddr::from(([127, 0, 0, 1], server.port()));

    // `..` segments are dropped, so this resolves to <public>/secret.txt,
    // which does not exist.
    let escape = raw_get(addr, "/../secret.txt").await;
    assert!(escape.starts_with("HTTP/1.1 404"), "got: {escape}");

    // Same shape against a staged name still lands inside the root.
    let inside = raw_get(addr, "/../app.js").await;
    assert!(inside.starts_with("HTTP/1.1 200"), "got: {inside}");
    assert!(inside.contains("inside the root"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn query_string_does_not_affect_lookup() {
    let dir = tempfile::tempdir().unwrap();
    stage(dir.path(), "app.js", b"bundle");

    let mut server = start_server(catch_all(dir.path()));
    let response = reqwest::get(url(&server, "/app.js?v=2")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"bundle");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn head_request_returns_headers_without_body() {
    let dir = tempfile::tempdir().unwrap();
    stage(dir.path(), "app.js", b"0123456789");

    let mut server = start_server(catch_all(dir.path()));
    let client = reqwest::Client::new();
    let response = client.head(url(&server, "/app.js")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-length"], "10");
    assert!(response.bytes().await.unwrap().is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn unsupported_method_answers_405() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = start_server(catch_all(dir.path()));

    let client = reqwest::Client::new();
    let response = client
        .post(url(&server, "/app.js"))
        .body("ignored")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 405);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn overlapping_requests_succeed_independently() {
    let dir = tempfile::tempdir().unwrap();
    stage(dir.path(), "a.js", b"content-a");
    stage(dir.path(), "b.js", b"content-b");

    let mut server = start_server(catch_all(dir.path()));
    let (a, b) = tokio::join!(
        reqwest::get(url(&server, "/a.js")),
        reqwest::get(url(&server, "/b.js")),
    );

    assert_eq!(a.unwrap().bytes().await.unwrap().as_ref(), b"content-a");
    assert_eq!(b.unwrap().bytes().await.unwrap().as_ref(), b"content-b");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn stop_releases_the_port() {
    let dir = tempfile::tempdir().unwrap();
    stage(dir.path(), "app.js", b"bundle");

    let mut server = start_server(catch_all(dir.path()));
    let addr = SocketAddr::from(([127, 0, 0, 1], server.port()));

    // Running: connections are accepted.
    assert!(TcpStream::connect(addr).await.is_ok());

    server.stop().await.unwrap();

    // Stopped: the socket is gone, connection attempts are refused.
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn stop_on_a_stopped_server_reports_not_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = start_server(catch_all(dir.path()));

    server.stop().await.unwrap();
    assert!(matches!(server.stop().await, Err(Error::NotRunning)));
}

#[tokio::test]
async fn start_on_a_running_server_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = start_server(catch_all(dir.path()));

    assert!(matches!(server.start(), Err(Error::AlreadyRunning)));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn binding_a_busy_port_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = start_server(catch_all(dir.path()));

    let second = StaticServer::bind(server.port(), catch_all(dir.path()), ServeOptions::default());
    assert!(matches!(second, Err(Error::Bind { .. })));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn empty_route_table_is_rejected_at_bind() {
    let result = StaticServer::bind(0, RouteTable::new(vec![]), ServeOptions::default());
    assert!(matches!(result, Err(Error::Config(_))));
}
