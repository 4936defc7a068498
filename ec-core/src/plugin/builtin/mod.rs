pub mod error_detect;
pub mod log_passthrough;
pub mod substitute;

pub use error_detect::ErrorDetectPlugin;
pub use log_passthrough::LogPassthroughPlugin;
pub use substitute::SubstitutePlugin;

/// A single-character chunk is a human typing one keystroke at a time at an
/// interactive prompt, not program output.
pub(crate) fn is_keystroke(chunk: &str) -> bool {
    let mut chars = chunk.chars();
    chars.next().is_some() && chars.next().is_none()
}
