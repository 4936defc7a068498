use crate::conf::{BuiltinPluginKind, EcConfig};
use crate::plugin::builtin::{ErrorDetectPlugin, LogPassthroughPlugin, SubstitutePlugin};
use crate::plugin::core::Plugin;
use crate::plugin::core::pipeline::PluginPipeline;
use crate::sink::LogSink;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Arc;

type BuiltinBuilder = fn(&EcConfig) -> Arc<dyn Plugin>;

fn build_substitute(_cfg: &EcConfig) -> Arc<dyn Plugin> {
    Arc::new(SubstitutePlugin)
}

fn build_log(cfg: &EcConfig) -> Arc<dyn Plugin> {
    Arc::new(LogPassthroughPlugin::new(Arc::new(LogSink::new(
        cfg.log.path(),
    ))))
}

fn build_detect(_cfg: &EcConfig) -> Arc<dyn Plugin> {
    Arc::new(ErrorDetectPlugin)
}

fn builtin_builders() -> HashMap<BuiltinPluginKind, BuiltinBuilder> {
    let mut map = HashMap::new();

    map.insert(
        BuiltinPluginKind::Substitute,
        build_substitute as BuiltinBuilder,
    );
    map.insert(BuiltinPluginKind::Log, build_log as BuiltinBuilder);
    map.insert(BuiltinPluginKind::Detect, build_detect as BuiltinBuilder);

    map
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configured plugins, in the order they are listed.
    pub fn load_from_config(&mut self, cfg: &EcConfig) -> Result<()> {
        let builders = builtin_builders();

        for name in &cfg.stream.plugins {
            let kind = BuiltinPluginKind::from_name(name)
                .ok_or_else(|| anyhow!("unknown plugin '{name}'"))?;

            let builder = builders
                .get(&kind)
                .ok_or_else(|| anyhow!("no builder registered for plugin '{name}'"))?;

            self.plugins.push(builder(cfg));
        }

        tracing::debug!(count = self.plugins.len(), "plugins loaded");
        Ok(())
    }

    pub fn all(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn into_pipeline(self) -> PluginPipeline {
        PluginPipeline::new(self.plugins)
    }
}
