//! Route-aware static file server for browser test harnesses.
//!
//! Serves staged build artifacts (a library bundle plus a sample app) over
//! HTTP while an external browser-automation test runner executes against
//! them. Requests are mapped to files through an ordered prefix route table;
//! `.` and `..` segments are discarded during resolution, so no request can
//! escape a route's root directory.
//!
//! ```no_run
//! use fixture_server::{Route, RouteTable, ServeOptions, StaticServer};
//!
//! # async fn run() -> Result<(), fixture_server::Error> {
//! let table = RouteTable::new(vec![
//!     Route::new("/media", "/srv/media"),
//!     Route::new("", "/srv/site"),
//! ]);
//! let mut server = StaticServer::bind(9000, table, ServeOptions::default())?;
//! server.start()?;
//! // ... run the test process against http://localhost:9000/ ...
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resolver;
pub mod server;

pub use error::Error;
pub use resolver::{ResolveError, Route, RouteTable};
pub use server::{ServeOptions, StaticServer};
