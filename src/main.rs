use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

use pagesrv::cli::Args;
use pagesrv::config::{AppState, Config};
use pagesrv::error::{Error, Result};
use pagesrv::{logger, server};

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = Config::load_from(&args.config, &args.overrides())?;

    if args.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    logger::init(&cfg)?;

    std::fs::canonicalize(&cfg.server.root).map_err(|source| Error::DocumentRoot {
        path: cfg.server.root.clone(),
        source,
    })?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers.filter(|&n| n > 0) {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<()> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let local_addr = listener.local_addr()?;

    let state = Arc::new(AppState::new(cfg));
    logger::log_server_start(&local_addr, &state.config, state.dispatcher.mime());

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    server::run(listener, state, shutdown).await
}
