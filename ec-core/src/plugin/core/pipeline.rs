use super::Plugin;
use super::errors::PluginError;
use std::sync::Arc;

/// Ordered chain of plugins. Each plugin's output is the next one's input.
#[derive(Clone, Default)]
pub struct PluginPipeline {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginPipeline {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run `chunk` through every plugin in order.
    ///
    /// Stops at the first error. An empty pipeline passes the chunk through.
    pub fn run(&self, chunk: &str) -> Result<String, PluginError> {
        let mut current = chunk.to_owned();
        for plugin in &self.plugins {
            current = plugin.transform(&current).inspect_err(|err| {
                tracing::error!(plugin = plugin.name(), error = %err, "plugin failed");
            })?;
        }
        Ok(current)
    }
}

impl std::fmt::Debug for PluginPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginPipeline")
            .field("plugins", &self.names())
            .finish()
    }
}
