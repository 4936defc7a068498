use super::is_keystroke;
use crate::plugin::{Plugin, PluginError};
use crate::sink::LogSink;
use std::sync::Arc;

/// Appends program output to the log file and passes it through unchanged.
///
/// Single keystrokes are passed through without being logged.
#[derive(Debug, Clone)]
pub struct LogPassthroughPlugin {
    sink: Arc<LogSink>,
}

impl LogPassthroughPlugin {
    pub fn new(sink: Arc<LogSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }
}

impl Plugin for LogPassthroughPlugin {
    fn name(&self) -> &'static str {
        "log"
    }

    fn transform(&self, chunk: &str) -> Result<String, PluginError> {
        if !is_keystroke(chunk) {
            self.sink
                .append(chunk)
                .map_err(|source| PluginError::Sink {
                    plugin: self.name(),
                    source,
                })?;
        }
        Ok(chunk.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn plugin_in(dir: &tempfile::TempDir) -> LogPassthroughPlugin {
        LogPassthroughPlugin::new(Arc::new(LogSink::new(dir.path().join("stderr.log"))))
    }

    #[test]
    fn multi_char_chunk_is_logged_and_returned() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_in(&dir);
        plugin.sink().append("before|").unwrap();

        // Act
        let out = plugin.transform("Traceback\n").unwrap();

        // Assert
        assert_eq!(out, "Traceback\n");
        assert_eq!(
            fs::read_to_string(plugin.sink().path()).unwrap(),
            "before|Traceback\n"
        );
    }

    #[test]
    fn single_keystrokes_are_not_logged() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_in(&dir);

        // Act
        let out: Vec<String> = ["a", "b", "c"]
            .iter()
            .map(|c| plugin.transform(c).unwrap())
            .collect();

        // Assert
        assert_eq!(out, vec!["a", "b", "c"]);
        assert!(!plugin.sink().path().exists());
    }

    #[test]
    fn single_multibyte_character_counts_as_keystroke() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_in(&dir);

        plugin.transform("é").unwrap();

        assert!(!plugin.sink().path().exists());
    }

    #[test]
    fn two_characters_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_in(&dir);

        plugin.transform("a\n").unwrap();

        assert_eq!(fs::read_to_string(plugin.sink().path()).unwrap(), "a\n");
    }

    #[test]
    fn sink_failure_is_reported_with_plugin_name() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let plugin =
            LogPassthroughPlugin::new(Arc::new(LogSink::new(blocker.join("stderr.log"))));

        // Act
        let err = plugin.transform("lost output\n").unwrap_err();

        // Assert
        assert_eq!(err.plugin(), "log");
    }
}
