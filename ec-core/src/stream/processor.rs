use super::decode::{ChunkDecoder, DecodeError};
use super::poll::{Readiness, wait_readable};
use crate::conf::{DecodeMode, StreamConfig};
use crate::plugin::{PluginError, PluginPipeline};
use crate::shutdown::Shutdown;
use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to poll input")]
    Poll(#[source] nix::Error),

    #[error("failed to read input")]
    Read(#[source] io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("failed to write output")]
    Write(#[source] io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    pub poll_interval_ms: u16,
    pub chunk_size: usize,
    pub decode: DecodeMode,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::from(&StreamConfig::default())
    }
}

impl From<&StreamConfig> for StreamOptions {
    fn from(cfg: &StreamConfig) -> Self {
        Self {
            poll_interval_ms: cfg.poll_interval_ms,
            chunk_size: cfg.chunk_size,
            decode: cfg.decode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// A read returned zero bytes.
    EndOfInput,
    /// Shutdown was requested between poll cycles.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub chunks: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub end: StreamEnd,
}

/// Polls `input`, runs every chunk through the pipeline and writes the result
/// to `output` before reading again.
pub struct StreamProcessor<R, W> {
    input: R,
    output: W,
    pipeline: PluginPipeline,
    options: StreamOptions,
    decoder: ChunkDecoder,
}

impl<R, W> StreamProcessor<R, W>
where
    R: Read + AsFd,
    W: Write,
{
    pub fn new(input: R, output: W, pipeline: PluginPipeline, options: StreamOptions) -> Self {
        Self {
            input,
            output,
            pipeline,
            decoder: ChunkDecoder::new(options.decode),
            options,
        }
    }

    /// Run until the input is exhausted, shutdown is requested, or an error
    /// occurs. Nothing is read after a zero-length read.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<StreamSummary, StreamError> {
        let mut buf = vec![0u8; self.options.chunk_size.max(1)];
        let mut summary = StreamSummary {
            chunks: 0,
            bytes_in: 0,
            bytes_out: 0,
            end: StreamEnd::EndOfInput,
        };

        loop {
            if shutdown.is_requested() {
                summary.end = StreamEnd::Shutdown;
                break;
            }

            let readiness = wait_readable(&self.input, self.options.poll_interval_ms)
                .map_err(StreamError::Poll)?;
            if readiness == Readiness::Idle {
                continue;
            }

            let n = match self.input.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Read(e)),
            };

            if n == 0 {
                if let Some(tail) = self.decoder.finish()? {
                    self.emit(&tail, &mut summary)?;
                }
                summary.end = StreamEnd::EndOfInput;
                break;
            }

            summary.bytes_in += n as u64;
            let text = self.decoder.decode(&buf[..n])?;
            if text.is_empty() {
                // Only the start of a multi-byte character so far.
                continue;
            }
            self.emit(&text, &mut summary)?;
        }

        Ok(summary)
    }

    fn emit(&mut self, text: &str, summary: &mut StreamSummary) -> Result<(), StreamError> {
        let out = self.pipeline.run(text)?;

        self.output
            .write_all(out.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(StreamError::Write)?;

        summary.chunks += 1;
        summary.bytes_out += out.len() as u64;
        tracing::trace!(bytes_in = text.len(), bytes_out = out.len(), "chunk processed");
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
