pub mod builtin;
pub mod core;

pub use self::core::errors::PluginError;
pub use self::core::pipeline::PluginPipeline;
pub use self::core::registry::PluginRegistry;
pub use self::core::Plugin;
