use std::path::{Component, Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    NotFound,
    Forbidden,
    BadPath,
}

/// Map a request path such as `/build` to `<log_dir>/build<suffix>`.
///
/// The path is percent-decoded once and must stay inside `log_dir`.
pub fn resolve_log_path(
    log_dir: &Path,
    request_path: &str,
    suffix: &str,
) -> Result<PathBuf, ResolveError> {
    let rel = request_path
        .strip_prefix('/')
        .ok_or(ResolveError::BadPath)?;

    // A single pass, so `%252e%252e` names a file called `%2e%2e`.
    let decoded = percent_encoding::percent_decode_str(rel)
        .decode_utf8()
        .map_err(|_| ResolveError::BadPath)?;

    if decoded.is_empty() {
        return Err(ResolveError::BadPath);
    }

    let relative_path = PathBuf::from(format!("{decoded}{suffix}"));

    // Only plain names; `..`, roots and prefixes never reach the filesystem.
    for component in relative_path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(ResolveError::Forbidden),
        }
    }

    // Nothing has been logged yet.
    let base_canon = log_dir
        .canonicalize()
        .map_err(|_| ResolveError::NotFound)?;

    let target_canon = log_dir
        .join(&relative_path)
        .canonicalize()
        .map_err(|_| ResolveError::NotFound)?;

    // A symlink inside the log directory may still point out of it.
    if !target_canon.starts_with(&base_canon) {
        return Err(ResolveError::Forbidden);
    }

    if !target_canon.is_file() {
        return Err(ResolveError::NotFound);
    }

    Ok(target_canon)
}
