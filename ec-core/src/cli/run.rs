use crate::conf::{DecodeMode, EcConfig, expand_home};
use clap::Args;
use std::path::PathBuf;

/// Command-line overrides for `ec run`.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Plugin to apply, in order (repeatable). Replaces the configured list.
    #[arg(long = "plugin", value_name = "NAME")]
    pub plugins: Vec<String>,

    /// How to treat bytes that are not valid UTF-8
    #[arg(long, value_enum)]
    pub decode: Option<DecodeMode>,

    /// Maximum bytes read per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Milliseconds to wait per poll before checking for shutdown
    #[arg(long)]
    pub poll_interval_ms: Option<u16>,

    /// Directory holding the log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl RunArgs {
    pub fn apply(&self, cfg: &mut EcConfig) {
        if !self.plugins.is_empty() {
            cfg.stream.plugins = self.plugins.clone();
        }
        if let Some(decode) = self.decode {
            cfg.stream.decode = decode;
        }
        if let Some(chunk_size) = self.chunk_size {
            cfg.stream.chunk_size = chunk_size;
        }
        if let Some(interval) = self.poll_interval_ms {
            cfg.stream.poll_interval_ms = interval;
        }
        if let Some(dir) = &self.log_dir {
            cfg.log.dir = expand_home(dir);
        }
    }
}
