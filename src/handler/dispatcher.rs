//! File dispatcher
//!
//! Owns the document root, the MIME table and the path rewrite hook. The hook
//! runs before the target is mapped onto the filesystem.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

use crate::http::MimeTable;
use crate::logger;
use crate::resolve::{self, RequestTarget};

/// Pre-serve rewrite of the raw request target
///
/// Closures of type `Fn(&str) -> String` implement it directly.
pub trait PathRewrite: Send + Sync {
    fn rewrite(&self, target: &str) -> String;
}

impl<F> PathRewrite for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn rewrite(&self, target: &str) -> String {
        self(target)
    }
}

/// Extensionless paths to `.html` / `index.html`
///
/// Malformed targets take the opaque `.html` fallback and are reported as a
/// warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRewrite;

impl PathRewrite for HtmlRewrite {
    fn rewrite(&self, target: &str) -> String {
        resolve::try_resolve(target).unwrap_or_else(|e| {
            logger::log_warning(&format!(
                "Malformed request target '{target}' ({e}); serving it as an opaque path"
            ));
            resolve::fallback(target)
        })
    }
}

/// Outcome of mapping a request target onto the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Target after the rewrite hook
    pub resolved: String,
    /// Filesystem path, or `None` when a segment is unusable
    pub file: Option<PathBuf>,
}

/// Static file dispatcher
pub struct Dispatcher {
    root: PathBuf,
    mime: MimeTable,
    rewrite: Box<dyn PathRewrite>,
}

impl Dispatcher {
    pub fn new(root: impl Into<PathBuf>, mime: MimeTable, rewrite: impl PathRewrite + 'static) -> Self {
        Self {
            root: root.into(),
            mime,
            rewrite: Box::new(rewrite),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn mime(&self) -> &MimeTable {
        &self.mime
    }

    /// Run the rewrite hook and map the result under the document root
    pub fn locate(&self, raw_target: &str) -> Located {
        let resolved = self.rewrite.rewrite(raw_target);
        let file = fs_relative_path(path_component(&resolved)).map(|rel| self.root.join(rel));
        Located { resolved, file }
    }
}

/// Path component of a target
///
/// Only absolute-form targets carry a netloc. Anything else, including an
/// origin-form path starting with `//`, is cut at the first `?` or `#` and
/// kept whole so that every segment stays part of the filesystem path.
fn path_component(target: &str) -> &str {
    match RequestTarget::parse(target) {
        Ok(t) if t.scheme.is_some() => t.path,
        _ => target.split(['?', '#']).next().unwrap_or(target),
    }
}

/// Decode a URL path into a root-relative filesystem path
///
/// `.` and empty segments are skipped and `..` never climbs above the root.
/// A segment that decodes to something containing `/`, `\` or NUL makes the
/// whole path unusable.
fn fs_relative_path(url_path: &str) -> Option<PathBuf> {
    let mut segments: Vec<String> = Vec::new();
    for raw in url_path.split('/') {
        let segment = percent_decode_str(raw).decode_utf8_lossy();
        match segment.as_ref() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['/', '\\', '\0']) => return None,
            s => segments.push(s.to_string()),
        }
    }
    Some(segments.iter().collect())
}
