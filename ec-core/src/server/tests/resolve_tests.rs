use crate::server::resolve::{ResolveError, resolve_log_path};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn maps_name_to_suffixed_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("foo.txt"), "bar").unwrap();

    // Act
    let path = resolve_log_path(dir.path(), "/foo", ".txt").unwrap();

    // Assert
    assert_eq!(path, dir.path().canonicalize().unwrap().join("foo.txt"));
}

#[test]
fn percent_encoded_names_are_decoded_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("my log.txt"), "").unwrap();

    assert!(resolve_log_path(dir.path(), "/my%20log", ".txt").is_ok());
    assert_eq!(
        resolve_log_path(dir.path(), "/my%2520log", ".txt"),
        Err(ResolveError::NotFound)
    );
}

#[test]
fn nested_names_stay_inside_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sessions")).unwrap();
    fs::write(dir.path().join("sessions/42.txt"), "").unwrap();

    assert!(resolve_log_path(dir.path(), "/sessions/42", ".txt").is_ok());
}

#[test]
fn traversal_is_forbidden() {
    let dir = tempfile::tempdir().unwrap();

    for path in ["/../secret", "/%2e%2e/secret", "/a/../../secret", "//etc/passwd", "/./foo"] {
        assert_eq!(
            resolve_log_path(dir.path(), path, ".txt"),
            Err(ResolveError::Forbidden),
            "path {path}"
        );
    }
}

#[cfg(unix)]
#[test]
fn symlink_out_of_log_dir_is_forbidden() {
    // Arrange
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), "").unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("secret.txt"),
        dir.path().join("leak.txt"),
    )
    .unwrap();

    // Act
    let result = resolve_log_path(dir.path(), "/leak", ".txt");

    // Assert
    assert_eq!(result, Err(ResolveError::Forbidden));
}

#[test]
fn missing_file_or_dir_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("folder.txt")).unwrap();

    assert_eq!(
        resolve_log_path(dir.path(), "/absent", ".txt"),
        Err(ResolveError::NotFound)
    );
    assert_eq!(
        resolve_log_path(dir.path(), "/folder", ".txt"),
        Err(ResolveError::NotFound)
    );
    assert_eq!(
        resolve_log_path(&dir.path().join("never-created"), "/foo", ".txt"),
        Err(ResolveError::NotFound)
    );
}

#[test]
fn empty_or_undecodable_name_is_bad() {
    let dir = tempfile::tempdir().unwrap();

    assert_eq!(
        resolve_log_path(dir.path(), "/", ".txt"),
        Err(ResolveError::BadPath)
    );
    assert_eq!(
        resolve_log_path(dir.path(), "/%ff", ".txt"),
        Err(ResolveError::BadPath)
    );
    assert_eq!(
        resolve_log_path(dir.path(), "relative", ".txt"),
        Err(ResolveError::BadPath)
    );
}
