//! Command-line arguments

use clap::Parser;

use crate::config::Overrides;

#[derive(Debug, Parser)]
#[command(name = "pagesrv", version)]
#[command(about = "Serve a directory over HTTP, mapping extensionless paths to .html pages", long_about = None)]
pub struct Args {
    /// Port to listen on
    #[arg(value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory to serve
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Configuration file, extension optional
    #[arg(short, long, default_value = "config", value_name = "PATH")]
    pub config: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.bind.clone(),
            port: self.port,
            root: self.directory.clone(),
        }
    }
}
