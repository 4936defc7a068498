use crate::sink::SinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin '{plugin}' could not append to the log: {source}")]
    Sink {
        plugin: &'static str,
        #[source]
        source: SinkError,
    },
}

impl PluginError {
    pub fn plugin(&self) -> &'static str {
        match self {
            Self::Sink { plugin, .. } => *plugin,
        }
    }
}
