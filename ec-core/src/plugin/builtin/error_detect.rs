use super::is_keystroke;
use crate::detect::extract_error;
use crate::plugin::{Plugin, PluginError};

/// Passes text through and reports recognized tool errors as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorDetectPlugin;

impl Plugin for ErrorDetectPlugin {
    fn name(&self) -> &'static str {
        "detect"
    }

    fn transform(&self, chunk: &str) -> Result<String, PluginError> {
        if !is_keystroke(chunk)
            && let Some(found) = extract_error(chunk)
        {
            tracing::warn!(
                language = found.language,
                title = %found.title,
                queries = ?found.queries,
                "error detected"
            );
        }
        Ok(chunk.to_owned())
    }
}
