use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fully resolved `ec` configuration.
///
/// Every block and field is optional in the file; anything left out takes
/// the default documented on the field.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EcConfig {
    /// Configuration schema version. Only `1` is supported.
    pub version: u32,
    pub stream: StreamConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
}

impl Default for EcConfig {
    fn default() -> Self {
        Self {
            version: 1,
            stream: StreamConfig::default(),
            log: LogConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// How long a single poll of stdin may wait before the shutdown flag is
    /// checked again. Default 100ms.
    pub poll_interval_ms: u16,

    /// Maximum bytes read per chunk. Default 4096.
    pub chunk_size: usize,

    /// What to do with bytes that are not valid UTF-8. Default `strict`.
    pub decode: DecodeMode,

    /// Plugins applied to every chunk, in order. Default `["substitute"]`.
    pub plugins: Vec<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            chunk_size: 4096,
            decode: DecodeMode::default(),
            plugins: vec![BuiltinPluginKind::Substitute.name().to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Malformed UTF-8 stops the processor with an error.
    #[default]
    Strict,
    /// Malformed UTF-8 is replaced with U+FFFD and processing continues.
    Lossy,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Directory holding the log file and the files served over HTTP.
    /// A leading `~` is expanded to the home directory. Default `~/.ec`.
    pub dir: PathBuf,

    /// Log file name inside `dir`. Default `stderr.log`.
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("~/.ec"),
            file: "stderr.log".to_string(),
        }
    }
}

impl LogConfig {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to listen on. Default `0.0.0.0` (all interfaces).
    pub listen: String,

    /// Default 80.
    pub port: u16,

    /// Appended to the request path to find the file to serve. Default `.txt`.
    pub suffix: String,

    /// Largest POST body accepted. Default 1 MiB.
    pub max_body_bytes: u64,

    /// Per-connection socket read timeout. Default 5000ms.
    pub read_timeout_ms: u64,

    /// Optional pid file, written on start and removed on shutdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0".to_string(),
            port: 80,
            suffix: ".txt".to_string(),
            max_body_bytes: 1024 * 1024,
            read_timeout_ms: 5000,
            pid_file: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinPluginKind {
    Substitute,
    Log,
    Detect,
}

impl BuiltinPluginKind {
    pub const ALL: [BuiltinPluginKind; 3] = [Self::Substitute, Self::Log, Self::Detect];

    pub fn name(self) -> &'static str {
        match self {
            Self::Substitute => "substitute",
            Self::Log => "log",
            Self::Detect => "detect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}
