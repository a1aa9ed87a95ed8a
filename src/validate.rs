use std::io::Read;
use std::path::Path;

use crate::error::{Result, ScriptgenError};

/// Validate a template document path.
///
/// Checks, in order: the path is not empty, it ends with `required_suffix`
/// (exact, case-sensitive), and a file exists at it. Never touches the file
/// contents, so repeated calls on an unchanged path agree.
pub fn validate_document(path: &Path, required_suffix: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ScriptgenError::EmptyPath {
            path: path.to_path_buf(),
        });
    }

    if !path.to_string_lossy().ends_with(required_suffix) {
        return Err(ScriptgenError::WrongExtension {
            path: path.to_path_buf(),
            expected: required_suffix.to_string(),
        });
    }

    if !path.is_file() {
        return Err(ScriptgenError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Validate a path handed over as the current selection.
///
/// Same as [`validate_document`], preceded by a check that the selection is a
/// source-like document at all. An empty selection is reported as
/// [`ScriptgenError::EmptyPath`].
pub fn validate_selection(path: &Path, required_suffix: &str) -> Result<()> {
    if !path.as_os_str().is_empty() && !is_script(path) {
        let asset = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(ScriptgenError::NotAScript {
            asset,
            path: path.to_path_buf(),
        });
    }

    validate_document(path, required_suffix)
}

/// Non-failing form of [`validate_selection`], for pre-flight UI state.
pub fn is_valid_selection(path: &Path, required_suffix: &str) -> bool {
    validate_selection(path, required_suffix).is_ok()
}

/// Whether `path` looks like a source document.
///
/// Directories and binary files are not. Paths that do not exist are let
/// through so the caller reports them as missing instead.
pub fn is_script(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }

    let Ok(file) = std::fs::File::open(path) else {
        return true;
    };

    let mut buf = [0u8; 8192];
    let Ok(n) = file.take(8192).read(&mut buf) else {
        return true;
    };

    content_inspector::inspect(&buf[..n]).is_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use rstest::rstest;
    use std::fs;

    const SUFFIX: &str = ".template.rs";

    #[test]
    fn test_empty_path() {
        let err = validate_document(Path::new(""), SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyPath);
    }

    #[test]
    fn test_empty_selection_reports_empty_path() {
        let err = validate_selection(Path::new(""), SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyPath);
        assert!(!is_valid_selection(Path::new(""), SUFFIX));
    }

    #[rstest]
    #[case("Foo.rs")]
    #[case("Foo.template.RS")]
    #[case("Foo.Template.rs")]
    #[case("Foo.template.rs.bak")]
    fn test_wrong_extension(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, "pub struct Foo;").unwrap();

        let err = validate_document(&path, SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::WrongExtension);
        assert!(err.to_string().contains(SUFFIX));
    }

    #[test]
    fn test_extension_checked_before_existence() {
        let err = validate_document(Path::new("/nonexistent/Foo.rs"), SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::WrongExtension);
    }

    #[test]
    fn test_missing_file() {
        let err =
            validate_document(Path::new("/nonexistent/Foo.template.rs"), SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MissingFile);
        assert_eq!(err.path(), Some(Path::new("/nonexistent/Foo.template.rs")));
    }

    #[test]
    fn test_valid_document_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.template.rs");
        fs::write(&path, "pub struct Foo;").unwrap();

        assert!(validate_document(&path, SUFFIX).is_ok());
        assert!(validate_document(&path, SUFFIX).is_ok());
        assert!(is_valid_selection(&path, SUFFIX));
        assert!(is_valid_selection(&path, SUFFIX));
    }

    #[test]
    fn test_failure_is_idempotent() {
        let path = Path::new("/nonexistent/Foo.template.rs");
        let first = validate_selection(path, SUFFIX).unwrap_err();
        let second = validate_selection(path, SUFFIX).unwrap_err();
        assert_eq!(first.kind(), second.kind());
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_binary_selection_is_not_a_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.template.rs");
        fs::write(&path, (0..=255u8).collect::<Vec<u8>>()).unwrap();

        let err = validate_selection(&path, SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotAScript);
        assert!(err.to_string().contains("Foo.template.rs"));
    }

    #[test]
    fn test_directory_selection_is_not_a_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.template.rs");
        fs::create_dir(&path).unwrap();

        let err = validate_selection(&path, SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotAScript);
    }

    #[test]
    fn test_not_a_script_checked_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_selection(dir.path(), SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotAScript);
    }

    #[test]
    fn test_missing_selection_reports_missing_file() {
        let err =
            validate_selection(Path::new("/nonexistent/Foo.template.rs"), SUFFIX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MissingFile);
    }
}
