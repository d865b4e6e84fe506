//! Static file serving module
//!
//! Maps a located target onto the filesystem, applies conditional and range
//! handling, and builds the response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::handler::dispatcher::Dispatcher;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, FileMeta, RangeParseResult};
use crate::logger;
use crate::resolve::RequestTarget;

/// Why a located path could not be served as a file
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("no such file")]
    NotFound,
    #[error("path is a directory")]
    Directory,
    #[error("path resolves outside the document root")]
    OutsideRoot,
    #[error("permission denied")]
    Forbidden,
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for ServeError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::Forbidden,
            _ => Self::Io(e),
        }
    }
}

/// File contents and modification time
#[derive(Debug)]
pub struct LoadedFile {
    pub data: Bytes,
    pub modified: Option<SystemTime>,
}

/// Serve the request target through the dispatcher
pub async fn serve(ctx: &RequestContext<'_>, dispatcher: &Dispatcher) -> Response<Full<Bytes>> {
    let located = dispatcher.locate(ctx.target);
    logger::log_debug(&format!("Resolved '{}' -> '{}'", ctx.target, located.resolved));

    let Some(file_path) = located.file else {
        logger::log_debug(&format!("Unusable path segment in '{}'", located.resolved));
        return http::build_404_response();
    };

    match load_file(dispatcher.root(), &file_path).await {
        Ok(file) => {
            let content_type = dispatcher
                .mime()
                .content_type(file_path.extension().and_then(OsStr::to_str));
            build_file_response(ctx, file, content_type)
        }
        Err(ServeError::Directory) => directory_redirect(ctx.target)
            .map_or_else(http::build_404_response, |location| {
                http::build_301_response(&location)
            }),
        Err(ServeError::NotFound) => http::build_404_response(),
        Err(e @ (ServeError::OutsideRoot | ServeError::Forbidden)) => {
            logger::log_warning(&format!(
                "Refused '{}' -> {}: {e}",
                ctx.target,
                file_path.display()
            ));
            http::build_403_response()
        }
        Err(ServeError::Io(e)) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            http::build_404_response()
        }
    }
}

/// Load a regular file that lives under `root`
pub async fn load_file(root: &Path, file_path: &Path) -> Result<LoadedFile, ServeError> {
    let root_canonical = fs::canonicalize(root).await.map_err(|e| {
        logger::log_warning(&format!(
            "Document root not found or inaccessible '{}': {e}",
            root.display()
        ));
        ServeError::NotFound
    })?;

    let file_canonical: PathBuf = fs::canonicalize(file_path).await?;
    if !file_canonical.starts_with(&root_canonical) {
        return Err(ServeError::OutsideRoot);
    }

    let metadata = fs::metadata(&file_canonical).await?;
    if metadata.is_dir() {
        return Err(ServeError::Directory);
    }

    let data = fs::read(&file_canonical).await?;
    Ok(LoadedFile {
        data: Bytes::from(data),
        modified: metadata.modified().ok(),
    })
}

/// Location for a directory requested without its trailing slash
///
/// Query is kept. `None` when the request already ended in `/`.
fn directory_redirect(raw_target: &str) -> Option<String> {
    let target = RequestTarget::parse(raw_target).ok()?;
    if target.path.is_empty() || target.path.ends_with('/') {
        return None;
    }
    Some(target.with_path(&format!("{}/", target.path)))
}

/// Build the response for a loaded file with conditional and Range support
fn build_file_response(
    ctx: &RequestContext<'_>,
    file: LoadedFile,
    content_type: &str,
) -> Response<Full<Bytes>> {
    let total_size = file.data.len() as u64;
    let etag = cache::generate_etag(total_size, file.modified);
    let last_modified = file.modified.map(cache::format_http_date);
    let meta = FileMeta {
        content_type,
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    // If-Modified-Since only counts when no If-None-Match was sent
    let not_modified = match ctx.if_none_match.as_deref() {
        Some(_) => cache::check_etag_match(ctx.if_none_match.as_deref(), &etag),
        None => cache::not_modified_since(ctx.if_modified_since.as_deref(), file.modified),
    };
    if not_modified {
        return http::response::build_304_response(&meta);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => {
            http::response::build_partial_response(&file.data, range, &meta, ctx.is_head)
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => http::response::build_file_response(file.data, &meta, ctx.is_head),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::dispatcher::HtmlRewrite;
    use crate::http::MimeTable;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(dir.path().join("about.html"), "about").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "docs").unwrap();
        std::fs::create_dir(dir.path().join("v1.2")).unwrap();
        dir
    }

    fn ctx(target: &str) -> RequestContext<'_> {
        RequestContext {
            target,
            is_head: false,
            if_none_match: None,
            if_modified_since: None,
            range_header: None,
        }
    }

    fn dispatcher(root: &Path) -> Dispatcher {
        Dispatcher::new(
            root,
            MimeTable::new([("js", "application/x-javascript")]),
            HtmlRewrite,
        )
    }

    #[tokio::test]
    async fn test_serves_rewritten_paths() {
        let dir = site();
        let d = dispatcher(dir.path());

        let resp = serve(&ctx("/about"), &d).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");

        assert_eq!(serve(&ctx("/"), &d).await.status(), 200);
        assert_eq!(serve(&ctx("/docs/"), &d).await.status(), 200);
    }

    #[tokio::test]
    async fn test_js_uses_configured_type() {
        let dir = site();
        let resp = serve(&ctx("/app.js"), &dispatcher(dir.path())).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/x-javascript");
    }

    #[tokio::test]
    async fn test_missing_and_traversal() {
        let dir = site();
        let d = dispatcher(dir.path());
        assert_eq!(serve(&ctx("/missing"), &d).await.status(), 404);
        assert_eq!(serve(&ctx("/../../etc/passwd"), &d).await.status(), 404);
        assert_eq!(serve(&ctx("/a%2Fb"), &d).await.status(), 404);
    }

    #[tokio::test]
    async fn test_dotted_directory_redirects() {
        let dir = site();
        let resp = serve(&ctx("/v1.2?x=1"), &dispatcher(dir.path())).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["Location"], "/v1.2/?x=1");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_not_listed() {
        let dir = site();
        assert_eq!(serve(&ctx("/v1.2/"), &dispatcher(dir.path())).await.status(), 404);
    }

    #[tokio::test]
    async fn test_conditional_and_range() {
        let dir = site();
        let d = dispatcher(dir.path());

        let first = serve(&ctx("/about"), &d).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();
        let last_modified = first.headers()["Last-Modified"].to_str().unwrap().to_string();

        let mut c = ctx("/about");
        c.if_none_match = Some(etag);
        assert_eq!(serve(&c, &d).await.status(), 304);

        let mut c = ctx("/about");
        c.if_modified_since = Some(last_modified);
        assert_eq!(serve(&c, &d).await.status(), 304);

        let mut c = ctx("/about");
        c.range_header = Some("bytes=0-1".to_string());
        let resp = serve(&c, &d).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["Content-Range"], "bytes 0-1/5");

        let mut c = ctx("/about");
        c.range_header = Some("bytes=10-".to_string());
        assert_eq!(serve(&c, &d).await.status(), 416);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_outside_root_is_forbidden() {
        let dir = site();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.html"), "secret").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.html"),
            dir.path().join("leak.html"),
        )
        .unwrap();
        assert_eq!(serve(&ctx("/leak"), &dispatcher(dir.path())).await.status(), 403);
    }

    #[test]
    fn test_directory_redirect_location() {
        assert_eq!(directory_redirect("/docs").as_deref(), Some("/docs/"));
        assert_eq!(directory_redirect("/docs?a=b").as_deref(), Some("/docs/?a=b"));
        assert_eq!(directory_redirect("/docs/"), None);
    }
}
