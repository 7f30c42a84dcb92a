//! Logger module
//!
//! Lifecycle events go to stdout/stderr; per-request access logging uses
//! [`AccessLogEntry`] with Common Log Format as the default.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// Write to info/access log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, route_count: usize) {
    write_info("======================================");
    write_info("Fixture server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Routes configured: {route_count}"));
    write_info("======================================");
}

pub fn log_server_stop(addr: &SocketAddr) {
    write_info(&format!("Fixture server stopped, released {addr}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_child_started(command: &str) {
    write_info(&format!("[Runner] Launching: {command}"));
}

pub fn log_child_exit(status: &std::process::ExitStatus) {
    if status.success() {
        write_info("[Runner] Test command completed successfully");
    } else {
        write_error(&format!("[Runner] Test command failed: {status}"));
    }
}
