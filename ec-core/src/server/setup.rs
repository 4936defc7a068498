use crate::conf::EcConfig;
use crate::server::listener::LogServer;
use crate::server::pid::PidFile;
use crate::shutdown::Shutdown;
use anyhow::Result;

/// Run the log server until `shutdown` is requested.
///
/// The listening socket is closed and the pid file (if any) removed before
/// returning.
pub fn run(cfg: &EcConfig, shutdown: &Shutdown) -> Result<()> {
    // Best-effort: a server without a pid file still serves.
    let _pid_file = cfg.server.pid_file.as_ref().and_then(|path| {
        PidFile::create(path)
            .inspect(|p| tracing::info!(pid_file = %p.path().display(), "pid file written"))
            .inspect_err(|e| {
                tracing::warn!(error = %e, pid_file = %path.display(), "failed to write pid file; continuing")
            })
            .ok()
    });

    let server = LogServer::bind(&cfg.server, &cfg.log.dir)?;

    tracing::info!(
        addr = %server.local_addr()?,
        log_dir = %cfg.log.dir.display(),
        suffix = %cfg.server.suffix,
        "log server started"
    );

    server.serve(shutdown)?;
    drop(server);

    tracing::info!("log server stopped");
    Ok(())
}
