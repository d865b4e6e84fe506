//! Request target splitting
//!
//! Splits a raw request target into scheme, netloc, path, query and fragment
//! without allocating, and joins the parts back together.

use std::fmt;

/// Reason a request target could not be split into components
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// Netloc carries an unbalanced `[` or `]`
    #[error("invalid IPv6 literal in netloc '{0}'")]
    InvalidIpv6Netloc(String),
}

/// Borrowed view of a request target
///
/// Every component except `path` is optional so that an empty `?` or `#`
/// survives a parse/serialize cycle byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    pub scheme: Option<&'a str>,
    pub netloc: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> RequestTarget<'a> {
    /// Split `raw` into its components
    ///
    /// # Examples
    /// ```
    /// use pagesrv::resolve::RequestTarget;
    ///
    /// let target = RequestTarget::parse("/docs/intro?lang=en#top").unwrap();
    /// assert_eq!(target.path, "/docs/intro");
    /// assert_eq!(target.query, Some("lang=en"));
    /// assert_eq!(target.fragment, Some("top"));
    /// ```
    pub fn parse(raw: &'a str) -> Result<Self, TargetError> {
        let (scheme, rest) = split_scheme(raw);

        let (rest, fragment) = match rest.split_once('#') {
            Some((before, fragment)) => (before, Some(fragment)),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((before, query)) => (before, Some(query)),
            None => (rest, None),
        };

        let (netloc, path) = match rest.strip_prefix("//") {
            Some(authority) => {
                let end = authority.find('/').unwrap_or(authority.len());
                let netloc = &authority[..end];
                if netloc.contains('[') != netloc.contains(']') {
                    return Err(TargetError::InvalidIpv6Netloc(netloc.to_string()));
                }
                (Some(netloc), &authority[end..])
            }
            None => (None, rest),
        };

        Ok(Self {
            scheme,
            netloc,
            path,
            query,
            fragment,
        })
    }

    /// Final path segment, after the last `/`
    pub fn basename(&self) -> &'a str {
        basename(self.path)
    }

    /// Dot-suffix of the final segment, without the dot
    ///
    /// `Some("")` means the segment ends with a bare `.`.
    pub fn extension(&self) -> Option<&'a str> {
        split_extension(self.path).1
    }

    /// Serialize the components around a replacement path
    pub fn with_path(&self, path: &str) -> String {
        let mut out = String::with_capacity(
            path.len()
                + self.scheme.map_or(0, |s| s.len() + 1)
                + self.netloc.map_or(0, |n| n.len() + 3)
                + self.query.map_or(0, |q| q.len() + 1)
                + self.fragment.map_or(0, |f| f.len() + 1),
        );
        if let Some(scheme) = self.scheme {
            out.push_str(scheme);
            out.push(':');
        }
        if let Some(netloc) = self.netloc {
            out.push_str("//");
            out.push_str(netloc);
            if !path.is_empty() && !path.starts_with('/') {
                out.push('/');
            }
        }
        out.push_str(path);
        if let Some(query) = self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

impl fmt::Display for RequestTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.with_path(self.path))
    }
}

/// Final segment of `path`
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split `path` into stem and the dot-suffix of its final segment
pub fn split_extension(path: &str) -> (&str, Option<&str>) {
    let name = basename(path);
    match name.rfind('.') {
        Some(dot) => {
            let at = path.len() - name.len() + dot;
            (&path[..at], Some(&path[at + 1..]))
        }
        None => (path, None),
    }
}

/// Leading `scheme:` of a target, when the prefix is a valid scheme name
fn split_scheme(raw: &str) -> (Option<&str>, &str) {
    let Some(colon) = raw.find(':') else {
        return (None, raw);
    };
    let candidate = &raw[..colon];
    let valid = candidate
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if valid {
        (Some(candidate), &raw[colon + 1..])
    } else {
        (None, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_form() {
        let t = RequestTarget::parse("/a/b?x=1&y=2#frag").unwrap();
        assert_eq!(t.scheme, None);
        assert_eq!(t.netloc, None);
        assert_eq!(t.path, "/a/b");
        assert_eq!(t.query, Some("x=1&y=2"));
        assert_eq!(t.fragment, Some("frag"));
    }

    #[test]
    fn test_absolute_form() {
        let t = RequestTarget::parse("http://example.com:8000/a.b/c?q").unwrap();
        assert_eq!(t.scheme, Some("http"));
        assert_eq!(t.netloc, Some("example.com:8000"));
        assert_eq!(t.path, "/a.b/c");
        assert_eq!(t.query, Some("q"));
        assert_eq!(t.fragment, None);
    }

    #[test]
    fn test_colon_in_path_is_not_a_scheme() {
        let t = RequestTarget::parse("/a:b").unwrap();
        assert_eq!(t.scheme, None);
        assert_eq!(t.path, "/a:b");

        let t = RequestTarget::parse("1x:rest").unwrap();
        assert_eq!(t.scheme, None);
        assert_eq!(t.path, "1x:rest");
    }

    #[test]
    fn test_question_mark_inside_fragment() {
        let t = RequestTarget::parse("/a#b?c").unwrap();
        assert_eq!(t.path, "/a");
        assert_eq!(t.query, None);
        assert_eq!(t.fragment, Some("b?c"));
    }

    #[test]
    fn test_empty_components_are_kept() {
        let t = RequestTarget::parse("/a?#").unwrap();
        assert_eq!(t.query, Some(""));
        assert_eq!(t.fragment, Some(""));
        assert_eq!(t.to_string(), "/a?#");
    }

    #[test]
    fn test_unbalanced_ipv6_netloc() {
        assert_eq!(
            RequestTarget::parse("http://[::1/x"),
            Err(TargetError::InvalidIpv6Netloc("[::1".to_string()))
        );
        assert!(RequestTarget::parse("http://[::1]:80/x").is_ok());
    }

    #[test]
    fn test_netloc_without_path_gets_separator() {
        let t = RequestTarget::parse("http://host").unwrap();
        assert_eq!(t.path, "");
        assert_eq!(t.with_path("index.html"), "http://host/index.html");
    }

    #[test]
    fn test_empty_netloc_gets_separator() {
        let t = RequestTarget::parse("//").unwrap();
        assert_eq!(t.netloc, Some(""));
        assert_eq!(t.path, "");
        assert_eq!(t.with_path("index.html"), "///index.html");

        let again = RequestTarget::parse("///index.html").unwrap();
        assert_eq!(again.netloc, Some(""));
        assert_eq!(again.path, "/index.html");
    }

    #[test]
    fn test_basename_and_extension_accessors() {
        let t = RequestTarget::parse("/a.b/c?x.y").unwrap();
        assert_eq!(t.basename(), "c");
        assert_eq!(t.extension(), None);

        let t = RequestTarget::parse("http://host/lib/app.min.js#v1.2").unwrap();
        assert_eq!(t.basename(), "app.min.js");
        assert_eq!(t.extension(), Some("js"));

        let t = RequestTarget::parse("/docs/").unwrap();
        assert_eq!(t.basename(), "");
        assert_eq!(t.extension(), None);

        let t = RequestTarget::parse("/.env").unwrap();
        assert_eq!(t.basename(), ".env");
        assert_eq!(t.extension(), Some("env"));
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("/a/b.js"), ("/a/b", Some("js")));
        assert_eq!(split_extension("/a.b/c"), ("/a.b/c", None));
        assert_eq!(split_extension("/a/b."), ("/a/b", Some("")));
        assert_eq!(split_extension("/a/archive.tar.gz"), ("/a/archive.tar", Some("gz")));
        assert_eq!(split_extension("/a/"), ("/a/", None));
        assert_eq!(split_extension(""), ("", None));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/a/b"), "b");
        assert_eq!(basename("/a/b/"), "");
        assert_eq!(basename("plain"), "plain");
    }
}
