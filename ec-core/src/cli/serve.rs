use crate::conf::{EcConfig, expand_home};
use clap::Args;
use std::path::PathBuf;

/// Command-line overrides for `ec serve`.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Interface to listen on
    #[arg(long)]
    pub listen: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Directory whose files are served
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Write the server pid here while running
    #[arg(long)]
    pub pid_file: Option<PathBuf>,
}

impl ServeArgs {
    pub fn apply(&self, cfg: &mut EcConfig) {
        if let Some(listen) = &self.listen {
            cfg.server.listen = listen.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(dir) = &self.log_dir {
            cfg.log.dir = expand_home(dir);
        }
        if let Some(pid_file) = &self.pid_file {
            cfg.server.pid_file = Some(expand_home(pid_file));
        }
    }
}
