pub mod errors;
pub mod pipeline;
pub mod registry;

use self::errors::PluginError;

/// A transformation applied to every chunk read by the stream processor.
///
/// A plugin receives one chunk of decoded text and returns the text that
/// should continue downstream. Plugins may have side effects (writing a log,
/// emitting events) but must hand back something to write, even if that is
/// the input unchanged.
///
/// Plugins must be Send and Sync so one instance can be shared between the
/// stream processor and anything else holding the pipeline.
pub trait Plugin: Send + Sync {
    /// Name used in configuration and in log events.
    fn name(&self) -> &'static str;

    /// Transform a single chunk.
    ///
    /// An error is fatal to the stream processor; return one only when the
    /// plugin cannot honor its contract (e.g. its log file is unwritable).
    fn transform(&self, chunk: &str) -> Result<String, PluginError>;
}
