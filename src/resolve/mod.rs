//! Path resolution module
//!
//! Rewrites request targets before they reach the file dispatcher:
//! - directory-like paths (`/`, `/docs/`) resolve to their `index.html`
//! - extensionless file paths (`/about`) get `.html` appended
//! - paths whose final segment already carries a dot-suffix are left alone
//!
//! Only the path component changes; scheme, netloc, query and fragment are
//! copied through verbatim. Only a literal `/` separates segments here, so
//! `%2F` and `\` are ordinary characters at this stage.

mod target;

pub use target::{basename, split_extension, RequestTarget, TargetError};

const INDEX_FILE: &str = "index.html";
const HTML_SUFFIX: &str = ".html";

/// Rewrite a request target, falling back to an opaque `.html` append when
/// the target cannot be split
///
/// # Examples
/// ```
/// use pagesrv::resolve::resolve;
///
/// assert_eq!(resolve("/"), "/index.html");
/// assert_eq!(resolve("/about"), "/about.html");
/// assert_eq!(resolve("/about/"), "/about/index.html");
/// assert_eq!(resolve("/script.js"), "/script.js");
/// assert_eq!(resolve("/a?x=1#y"), "/a.html?x=1#y");
/// ```
pub fn resolve(raw: &str) -> String {
    try_resolve(raw).unwrap_or_else(|_| fallback(raw))
}

/// Rewrite a request target, reporting targets that cannot be split
pub fn try_resolve(raw: &str) -> Result<String, TargetError> {
    let target = RequestTarget::parse(raw)?;
    Ok(target.with_path(&rewrite_path(&target)))
}

/// Fallback for malformed targets: the whole string is an extensionless path
pub fn fallback(raw: &str) -> String {
    format!("{raw}{HTML_SUFFIX}")
}

/// Apply the rewrite rule to the path component of `target`
///
/// A final segment made only of a dot-suffix (`/.env`) keeps its suffix: the
/// directory check only runs when there is no extension at all.
fn rewrite_path(target: &RequestTarget<'_>) -> String {
    match target.extension() {
        None if target.basename().is_empty() => format!("{}{INDEX_FILE}", target.path),
        None => format!("{}{HTML_SUFFIX}", target.path),
        Some(_) => target.path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenarios() {
        assert_eq!(resolve("/"), "/index.html");
        assert_eq!(resolve("/about"), "/about.html");
        assert_eq!(resolve("/about/"), "/about/index.html");
        assert_eq!(resolve("/script.js"), "/script.js");
        assert_eq!(resolve("/a.b/c"), "/a.b/c.html");
    }

    #[test]
    fn test_trailing_slash_appends_index() {
        for p in ["/a/b/", "/x/", "/a.b/", "/deep/er/path/", "/%2F/"] {
            assert_eq!(resolve(p), format!("{p}index.html"), "path {p}");
        }
    }

    #[test]
    fn test_dotted_final_segment_unchanged() {
        for p in ["/a/b.js", "/style.css", "/a/archive.tar.gz", "/a/b.", "/.env", "/x/..."] {
            assert_eq!(resolve(p), p, "path {p}");
        }
    }

    #[test]
    fn test_extensionless_final_segment_appends_html() {
        for p in ["/a", "/a/b", "/a.b/c", "/a\\b", "/a%2Fb", "/blog/2024"] {
            assert_eq!(resolve(p), format!("{p}.html"), "path {p}");
        }
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(resolve(""), "index.html");
        assert_eq!(resolve("?q=1"), "index.html?q=1");
    }

    #[test]
    fn test_query_and_fragment_preserved() {
        assert_eq!(resolve("/a?x=1#y"), "/a.html?x=1#y");
        assert_eq!(resolve("/docs/?page=2"), "/docs/index.html?page=2");
        assert_eq!(resolve("/app.js?v=3"), "/app.js?v=3");
        assert_eq!(resolve("/a?"), "/a.html?");
        assert_eq!(resolve("/a?x.y"), "/a.html?x.y");
    }

    #[test]
    fn test_absolute_form_keeps_scheme_and_netloc() {
        assert_eq!(
            resolve("http://example.com/about"),
            "http://example.com/about.html"
        );
        assert_eq!(
            resolve("http://example.com"),
            "http://example.com/index.html"
        );
        assert_eq!(
            resolve("HTTP://Example.com/a.b/"),
            "HTTP://Example.com/a.b/index.html"
        );
    }

    #[test]
    fn test_second_application_is_fixed_point() {
        for p in [
            "/",
            "/about",
            "/about/",
            "/script.js",
            "/a.b/c",
            "/a?x=1#y",
            "",
            "http://host",
            "/a/b.",
            "//",
            "//host",
            "///about",
        ] {
            let once = resolve(p);
            assert_eq!(resolve(&once), once, "input {p}");
        }
    }

    #[test]
    fn test_empty_netloc_keeps_separator() {
        assert_eq!(resolve("//"), "///index.html");
        assert_eq!(resolve("//host"), "//host/index.html");
        assert_eq!(resolve("//host/"), "//host/index.html");
    }

    #[test]
    fn test_malformed_target_falls_back() {
        assert!(try_resolve("http://[::1/page").is_err());
        assert_eq!(resolve("http://[::1/page"), "http://[::1/page.html");
        assert_eq!(resolve("//]bad/"), "//]bad/.html");
    }

    #[test]
    fn test_arbitrary_input_does_not_panic() {
        for p in ["#", "?", "//", ":", "::", "a:", "\u{0}", "/é/ü", "/\u{1F600}.png", "[", "]"] {
            let _ = resolve(p);
        }
    }
}
