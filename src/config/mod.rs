// Configuration module entry point
// Layers defaults, config file, environment and command-line overrides

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::{Error, Result};

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable prefix, e.g. `PAGESRV_SERVER__PORT=9000`
const ENV_PREFIX: &str = "PAGESRV";

/// Values given on the command line; they win over every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<String>,
}

impl Config {
    /// Load configuration from the given file path (extension optional)
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", concat!("pagesrv/", env!("CARGO_PKG_VERSION")))?
            .set_default("http.enable_cors", false)?;

        for (ext, content_type) in types::default_mime_overrides() {
            builder = builder.set_default(format!("mime.{ext}"), content_type)?;
        }

        let settings = builder
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("server.root", overrides.root.clone())?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let addr = format_addr(&self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| Error::Address { addr, source })
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Join host and port, bracketing bare IPv6 hosts
fn format_addr(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(contents: &str, overrides: &Overrides) -> Config {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Config::load_from(file.path().to_str().unwrap(), overrides).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("does-not-exist", &Overrides::default()).unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.root, ".");
        assert_eq!(cfg.logging.access_log_format, "common");
        assert_eq!(
            cfg.mime.get("js").map(String::as_str),
            Some("application/x-javascript")
        );
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_file_values_and_mime_merge() {
        let cfg = load(
            "[server]\nport = 9100\nroot = \"public\"\n\n[mime]\nmd = \"text/markdown\"\n",
            &Overrides::default(),
        );
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.root, "public");
        assert_eq!(cfg.mime.get("md").map(String::as_str), Some("text/markdown"));
        assert!(cfg.mime.contains_key("js"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let overrides = Overrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(9200),
            root: Some("site".to_string()),
        };
        let cfg = load("[server]\nport = 9100\n", &overrides);
        assert_eq!(cfg.server.port, 9200);
        assert_eq!(cfg.server.root, "site");
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:9200");
    }

    #[test]
    fn test_ipv6_host() {
        assert_eq!(format_addr("::1", 8000), "[::1]:8000");
        assert_eq!(format_addr("[::1]", 8000), "[::1]:8000");
        assert_eq!(format_addr("localhost", 8000), "localhost:8000");
    }

    #[test]
    fn test_invalid_address() {
        let overrides = Overrides {
            host: Some("not an ip".to_string()),
            ..Overrides::default()
        };
        let cfg = Config::load_from("does-not-exist", &overrides).unwrap();
        assert!(matches!(cfg.get_socket_addr(), Err(Error::Address { .. })));
    }

    #[test]
    fn test_to_toml() {
        let cfg = Config::load_from("does-not-exist", &Overrides::default()).unwrap();
        let rendered = cfg.to_toml().unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("application/x-javascript"));
    }
}
