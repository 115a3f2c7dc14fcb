use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::logging;
use crate::web;

/// Handle the `serve` command: logger, runtime, HTTP server.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Serve { bind, port } = cmd else {
        return Ok(());
    };

    let mut cfg = cfg.clone();
    if let Some(bind) = bind {
        cfg.bind_address = bind.clone();
    }
    if let Some(port) = port {
        cfg.port = *port;
    }

    logging::init_logger()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(web::serve(&cfg))
}
