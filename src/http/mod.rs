//! HTTP protocol layer.
//!
//! Response builders and MIME mapping, decoupled from request dispatch.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_500_response, build_file_response,
    build_html_response, build_options_response,
};
