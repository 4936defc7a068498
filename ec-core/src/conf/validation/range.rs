use crate::conf::validation::ValidationReport;
use std::fmt::Display;
use std::ops::RangeInclusive;

/// Accepted bounds for a numeric setting, keyed by its dotted config path.
#[derive(Debug, Clone)]
pub struct RangeConstraint<T> {
    pub key: &'static str,
    pub bounds: RangeInclusive<T>,
    pub units: &'static str,
}

impl<T: PartialOrd + Display> RangeConstraint<T> {
    /// Record an error in `report` unless `value` is within bounds.
    pub fn check(&self, value: T, report: &mut ValidationReport) {
        if self.bounds.contains(&value) {
            return;
        }

        let (section, _) = self.key.split_once('.').unwrap_or((self.key, ""));
        let u = self.units;
        report.error(
            format!("invalid {}: {value}{u}", self.key),
            section,
            Some(format!(
                "use a value between {}{u} and {}{u}",
                self.bounds.start(),
                self.bounds.end()
            )),
        );
    }
}

pub const STREAM_CHUNK_SIZE: RangeConstraint<usize> = RangeConstraint {
    key: "stream.chunk_size",
    bounds: 1..=1024 * 1024,
    units: " bytes",
};

pub const STREAM_POLL_INTERVAL_MS: RangeConstraint<u16> = RangeConstraint {
    key: "stream.poll_interval_ms",
    bounds: 0..=60_000,
    units: "ms",
};

pub const SERVER_READ_TIMEOUT_MS: RangeConstraint<u64> = RangeConstraint {
    key: "server.read_timeout_ms",
    bounds: 1..=10 * 60 * 1000,
    units: "ms",
};
