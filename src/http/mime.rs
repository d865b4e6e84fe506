//! MIME type detection module
//!
//! A built-in extension table plus explicit overrides supplied when the
//! dispatcher is constructed. Overrides win over the built-in entries.

use std::collections::HashMap;

const OCTET_STREAM: &str = "application/octet-stream";

/// Extension to Content-Type mapping
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    overrides: HashMap<String, String>,
}

impl MimeTable {
    /// Build a table from `extension -> content type` overrides
    ///
    /// Keys may be given with or without the leading dot and in any case.
    pub fn new<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let overrides = overrides
            .into_iter()
            .map(|(ext, ty)| (normalize(ext.as_ref()), ty.into()))
            .collect();
        Self { overrides }
    }

    /// Get the Content-Type for a file extension
    ///
    /// Lookup is case-insensitive; unknown extensions map to
    /// `application/octet-stream`.
    ///
    /// # Examples
    /// ```
    /// use pagesrv::http::mime::MimeTable;
    ///
    /// let table = MimeTable::new([(".js", "application/x-javascript")]);
    /// assert_eq!(table.content_type(Some("js")), "application/x-javascript");
    /// assert_eq!(table.content_type(Some("HTML")), "text/html; charset=utf-8");
    /// assert_eq!(table.content_type(None), "application/octet-stream");
    /// ```
    pub fn content_type(&self, extension: Option<&str>) -> &str {
        let Some(ext) = extension.map(normalize) else {
            return OCTET_STREAM;
        };
        if let Some(ty) = self.overrides.get(&ext) {
            return ty;
        }
        builtin_content_type(&ext).unwrap_or(OCTET_STREAM)
    }

    /// Configured overrides, for startup logging
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

fn builtin_content_type(extension: &str) -> Option<&'static str> {
    let ty = match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "csv" => "text/csv",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(ty)
}
