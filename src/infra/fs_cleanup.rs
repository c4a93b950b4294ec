use std::{fs, io::ErrorKind, path::Path};

const FS_CLEANUP_FAILED: &str = "FS_CLEANUP_FAILED";

/// Recursively deletes `path` if it is a directory. Failures are logged, never returned.
///
/// Returns whether anything was removed.
pub fn remove_dir_best_effort(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }

    match fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "directory removed");
            true
        }
        Err(error) if error.kind() == ErrorKind::NotFound => false,
        Err(error) => {
            tracing::warn!(
                code = FS_CLEANUP_FAILED,
                path = %path.display(),
                error = %error,
                "directory removal failed; continuing"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_nested_directory_tree() {
        let root = tempfile::tempdir().expect("temp dir");
        let target = root.path().join("cache");
        fs::create_dir_all(target.join("a/b")).expect("tree should be creatable");
        fs::write(target.join("a/b/file.bin"), b"data").expect("file should be writable");

        assert!(remove_dir_best_effort(&target));
        assert!(!target.exists());
    }

    #[test]
    fn missing_directory_is_a_no_op() {
        let root = tempfile::tempdir().expect("temp dir");

        assert!(!remove_dir_best_effort(&root.path().join("absent")));
    }

    #[test]
    fn regular_file_is_left_alone() {
        let root = tempfile::tempdir().expect("temp dir");
        let file = root.path().join("photos");
        fs::write(&file, b"not a dir").expect("file should be writable");

        assert!(!remove_dir_best_effort(&file));
        assert!(file.exists());
    }
}
