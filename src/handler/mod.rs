//! Request handler module
//!
//! The dispatcher runs the path rewrite hook, then serves the resolved file
//! from the document root.

pub mod dispatcher;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use dispatcher::{Dispatcher, HtmlRewrite, Located, PathRewrite};
pub use router::handle_request;
