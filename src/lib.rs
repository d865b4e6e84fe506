//! pagesrv: a static file server for sites whose links omit the `.html`
//! extension.
//!
//! Request targets go through [`resolve::resolve`] before the filesystem is
//! consulted:
//!
//! ```
//! use pagesrv::resolve::resolve;
//!
//! assert_eq!(resolve("/"), "/index.html");
//! assert_eq!(resolve("/about?x=1"), "/about.html?x=1");
//! assert_eq!(resolve("/docs/"), "/docs/index.html");
//! assert_eq!(resolve("/app.js"), "/app.js");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resolve;
pub mod server;
