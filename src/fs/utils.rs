//! Shared path helpers for filesystem operations.

use crate::error::{FmError, Result};

/// Check that `child` lies strictly below `parent`.
///
/// An empty or `/` parent is the root and contains every non-root path.
pub(crate) fn is_strict_descendant(parent: &str, child: &str) -> bool {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_end_matches('/');

    if parent.is_empty() {
        return !child.trim_start_matches('/').is_empty();
    }

    match child.strip_prefix(parent) {
        Some(rest) => rest.len() > 1 && rest.starts_with('/'),
        None => false,
    }
}

/// Join a parent directory path and an entry name.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}

/// Validate a new directory name typed by the user.
///
/// Returns the trimmed name.
pub(crate) fn validate_dir_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FmError::Validation(
            "Directory name cannot be empty".to_string(),
        ));
    }
    if name.contains('/') {
        return Err(FmError::Validation(format!(
            "Directory name cannot contain '/': {}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(FmError::Validation(format!(
            "Invalid directory name: {}",
            name
        )));
    }
    Ok(name)
}

/// Check that the last segment of a path is non-empty.
pub(crate) fn validate_leaf(path: &str) -> Result<()> {
    match path.rsplit('/').next() {
        Some(leaf) if !leaf.trim().is_empty() => Ok(()),
        _ => Err(FmError::Validation(format!(
            "Path has an empty final segment: {:?}",
            path
        ))),
    }
}

/// Lowercase extension of the last path segment, if any.
///
/// Dotfiles such as `.bashrc` have no extension.
pub(crate) fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Number of chunks for a file. An empty file still takes one chunk.
///
/// Chunk numbers are `u32` and the job counts one past the last chunk, so
/// the count must stay below `u32::MAX`.
pub(crate) fn chunk_count(file_size: u64, chunk_size: u64) -> Result<u32> {
    let chunks = file_size.div_ceil(chunk_size).max(1);
    u32::try_from(chunks)
        .ok()
        .filter(|&n| n < u32::MAX)
        .ok_or_else(|| {
            FmError::Validation(format!(
                "File needs {} chunks of {} bytes, more than a chunked upload can number",
                chunks, chunk_size
            ))
        })
}

/// Size of the given 1-based chunk.
pub(crate) fn chunk_len(chunk_number: u32, file_size: u64, chunk_size: u64) -> u64 {
    let offset = u64::from(chunk_number - 1) * chunk_size;
    file_size.saturating_sub(offset).min(chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_strict_descendant() {
        assert!(is_strict_descendant("/docs", "/docs/a.txt"));
        assert!(is_strict_descendant("/docs/", "/docs/sub/a.txt"));
        assert!(is_strict_descendant("", "/docs"));
        assert!(is_strict_descendant("/", "/docs"));
        assert!(!is_strict_descendant("/docs", "/docs"));
        assert!(!is_strict_descendant("/docs", "/docsx/a.txt"));
        assert!(!is_strict_descendant("/docs", "/other"));
        assert!(!is_strict_descendant("", "/"));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/docs", "new"), "/docs/new");
        assert_eq!(join_path("/docs/", "new"), "/docs/new");
        assert_eq!(join_path("", "new"), "/new");
    }

    #[test]
    fn test_validate_dir_name() {
        assert_eq!(validate_dir_name("  reports ").unwrap(), "reports");
        assert!(validate_dir_name("").unwrap_err().is_validation());
        assert!(validate_dir_name("   ").unwrap_err().is_validation());
        assert!(validate_dir_name("a/b").is_err());
        assert!(validate_dir_name("..").is_err());
    }

    #[test]
    fn test_validate_leaf() {
        assert!(validate_leaf("/docs/new").is_ok());
        assert!(validate_leaf("/docs/").is_err());
        assert!(validate_leaf("").is_err());
    }

    #[test]
    fn test_chunk_math() {
        let mib = 1024 * 1024;
        assert_eq!(chunk_count(10 * mib, 4 * mib).unwrap(), 3);
        assert_eq!(chunk_count(8 * mib, 4 * mib).unwrap(), 2);
        assert_eq!(chunk_count(1, 4 * mib).unwrap(), 1);
        assert_eq!(chunk_count(0, 4 * mib).unwrap(), 1);

        assert_eq!(chunk_len(1, 10 * mib, 4 * mib), 4 * mib);
        assert_eq!(chunk_len(2, 10 * mib, 4 * mib), 4 * mib);
        assert_eq!(chunk_len(3, 10 * mib, 4 * mib), 2 * mib);
        assert_eq!(chunk_len(1, 0, 4 * mib), 0);
    }

    #[test]
    fn test_chunk_count_rejects_unnumberable_files() {
        let max = u64::from(u32::MAX);
        assert_eq!(chunk_count(max - 1, 1).unwrap(), u32::MAX - 1);
        assert!(chunk_count(max, 1).unwrap_err().is_validation());
        assert!(chunk_count(max + 10, 1).unwrap_err().is_validation());
        assert!(chunk_count(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/a/photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("/a/.bashrc"), None);
        assert_eq!(extension_of("/a/Makefile"), None);
        assert_eq!(extension_of("/dir.png/file"), None);
        assert_eq!(extension_of("/a/trailing."), None);
    }
}
