use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::server;

/// Handle `serve`: run the HTTP API until interrupted.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { host, port } = cmd {
        let mut cfg = cfg.clone();
        if let Some(h) = host {
            cfg.server.host = h.clone();
        }
        if let Some(p) = port {
            cfg.server.port = *p;
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(server::serve(cfg))?;
    }

    Ok(())
}
