//! The read → transform → write loop behind `ec run`.
//!
//! ```text
//! stdin
//!   poll (wait_readable, bounded by poll_interval_ms)
//!   read  (at most chunk_size bytes)
//!   ChunkDecoder
//!   PluginPipeline
//! stdout (flushed per chunk)
//! ```

mod decode;
mod poll;
mod processor;
#[cfg(test)]
mod tests;

pub use decode::{ChunkDecoder, DecodeError};
pub use poll::{Readiness, wait_readable};
pub use processor::{StreamEnd, StreamError, StreamOptions, StreamProcessor, StreamSummary};

use crate::conf::EcConfig;
use crate::plugin::PluginRegistry;
use crate::shutdown::Shutdown;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::AsFd;

/// Run the configured plugin pipeline over this process's stdin and stdout.
pub fn run_stdio(cfg: &EcConfig, shutdown: &Shutdown) -> Result<StreamSummary> {
    // Read through our own descriptor so no userspace buffer hides bytes
    // from poll.
    let stdin = io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .context("failed to duplicate stdin")?;

    run_configured(cfg, File::from(stdin), io::stdout().lock(), shutdown)
}

/// Build the plugins named in `cfg` and run them from `input` to `output`.
pub fn run_configured<R, W>(
    cfg: &EcConfig,
    input: R,
    output: W,
    shutdown: &Shutdown,
) -> Result<StreamSummary>
where
    R: Read + AsFd,
    W: Write,
{
    let mut registry = PluginRegistry::new();
    registry.load_from_config(cfg)?;
    let pipeline = registry.into_pipeline();

    tracing::info!(
        plugins = ?pipeline.names(),
        chunk_size = cfg.stream.chunk_size,
        poll_interval_ms = cfg.stream.poll_interval_ms,
        "stream processor started"
    );

    let mut processor =
        StreamProcessor::new(input, output, pipeline, StreamOptions::from(&cfg.stream));
    let summary = processor.run(shutdown)?;

    tracing::info!(
        chunks = summary.chunks,
        bytes_in = summary.bytes_in,
        bytes_out = summary.bytes_out,
        end = ?summary.end,
        "stream processor stopped"
    );
    Ok(summary)
}
