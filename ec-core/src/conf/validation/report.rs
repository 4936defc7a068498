use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    /// Config block the issue belongs to (`stream`, `log`, `server`, ...).
    pub section: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

#[derive(Serialize)]
struct ValidationReportJson<'a> {
    errors: &'a [ValidationIssue],
    warnings: &'a [ValidationIssue],
}

impl ValidationReport {
    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, message: String, section: &str, help: Option<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            message,
            section: section.to_owned(),
            help,
        });
    }

    pub(crate) fn warning(&mut self, message: String, section: &str, help: Option<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            message,
            section: section.to_owned(),
            help,
        });
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ValidationReportJson {
            errors: &self.errors,
            warnings: &self.warnings,
        })
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };

            out.push_str(&format!("{}: {}: {}\n", issue.section, severity, issue.message));

            if let Some(help) = &issue.help {
                out.push_str(&format!("  help: {help}\n"));
            }
        }
        out
    }
}

/// Stream Config Validation
impl ValidationReport {
    pub fn unknown_plugin(&mut self, name: &str, known: &[&str]) {
        self.error(
            format!("unknown plugin: {name}"),
            "stream",
            Some(format!("available plugins: {}", known.join(", "))),
        )
    }

    pub fn no_plugins(&mut self) {
        self.warning(
            "no plugins configured; input is copied to output unchanged".to_string(),
            "stream",
            None,
        )
    }
}

/// Log Config Validation
impl ValidationReport {
    pub fn invalid_log_file_name(&mut self, file: &str) {
        self.error(
            format!("invalid log file name: {file:?}"),
            "log",
            Some("use a plain file name; set the directory with `dir`".to_string()),
        )
    }

    pub fn log_dir_not_a_dir(&mut self, dir: std::path::Display) {
        self.error(
            format!("log dir exists but is not a directory: {dir}"),
            "log",
            None,
        )
    }
}

/// Server Config Validation
impl ValidationReport {
    pub fn invalid_config_version(&mut self, version: u32) {
        self.error(format!("invalid config version: {version}"), "config", None)
    }

    pub fn invalid_listen_addr(&mut self, addr: &str) {
        self.error(
            format!("invalid listen address: {addr}"),
            "server",
            Some("use an IP address such as 0.0.0.0 or 127.0.0.1".to_string()),
        )
    }

    pub fn invalid_suffix(&mut self, suffix: &str) {
        self.error(
            format!("invalid file suffix: {suffix:?} (must not contain a path separator)"),
            "server",
            None,
        )
    }

    pub fn pid_file_parent_dir_does_not_exist(&mut self, pid_file: std::path::Display) {
        self.error(
            format!("pid file parent directory does not exist: {pid_file}"),
            "server",
            None,
        )
    }

    pub fn pid_file_parent_not_a_dir(&mut self, pid_file: std::path::Display) {
        self.error(
            format!("pid file parent is not a directory: {pid_file}"),
            "server",
            None,
        )
    }
}
