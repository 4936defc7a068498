use crate::conf::types::{BuiltinPluginKind, EcConfig, LogConfig, ServerConfig, StreamConfig};
use crate::conf::validation::range::{
    SERVER_READ_TIMEOUT_MS, STREAM_CHUNK_SIZE, STREAM_POLL_INTERVAL_MS,
};
use crate::conf::validation::report::ValidationReport;
use std::net::IpAddr;
use std::path::{Component, Path};

/// Validate everything in a resolved config, aggregating all issues.
pub fn validate_config(cfg: &EcConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    if validate_version(cfg, &mut report) {
        validate_stream(&cfg.stream, &mut report);
        validate_log(&cfg.log, &mut report);
        validate_server(&cfg.server, &mut report);
    }
    report
}

/// Validate top-level config version.
///
/// Fail-fast: invalid versions invalidate the entire config model.
pub fn validate_version(cfg: &EcConfig, report: &mut ValidationReport) -> bool {
    if cfg.version != 1 {
        report.invalid_config_version(cfg.version);
        return false;
    }
    true
}

pub fn validate_stream(cfg: &StreamConfig, report: &mut ValidationReport) {
    STREAM_CHUNK_SIZE.check(cfg.chunk_size, report);
    STREAM_POLL_INTERVAL_MS.check(cfg.poll_interval_ms, report);

    if cfg.plugins.is_empty() {
        report.no_plugins();
    }

    let known: Vec<&str> = BuiltinPluginKind::ALL.iter().map(|k| k.name()).collect();
    for name in &cfg.plugins {
        if BuiltinPluginKind::from_name(name).is_none() {
            report.unknown_plugin(name, &known);
        }
    }
}

pub fn validate_log(cfg: &LogConfig, report: &mut ValidationReport) {
    if !is_plain_file_name(&cfg.file) {
        report.invalid_log_file_name(&cfg.file);
    }

    if cfg.dir.exists() && !cfg.dir.is_dir() {
        report.log_dir_not_a_dir(cfg.dir.display());
    }
}

pub fn validate_server(cfg: &ServerConfig, report: &mut ValidationReport) {
    if cfg.listen.parse::<IpAddr>().is_err() {
        report.invalid_listen_addr(&cfg.listen);
    }

    if cfg.suffix.contains(['/', '\\']) {
        report.invalid_suffix(&cfg.suffix);
    }

    SERVER_READ_TIMEOUT_MS.check(cfg.read_timeout_ms, report);

    if let Some(pid_file) = &cfg.pid_file {
        let Some(parent) = pid_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return;
        };

        if !parent.exists() {
            report.pid_file_parent_dir_does_not_exist(pid_file.display());
        } else if !parent.is_dir() {
            report.pid_file_parent_not_a_dir(pid_file.display());
        }
    }
}

/// A single normal path component: no separators, no `.`/`..`, not empty.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
