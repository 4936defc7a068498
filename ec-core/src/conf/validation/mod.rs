mod range;
mod report;
mod validate;

pub use range::RangeConstraint;
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use validate::{validate_config, validate_log, validate_server, validate_stream, validate_version};
