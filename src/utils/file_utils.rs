//! File system utilities

use std::fs;
use std::io;
use std::path::Path;

/// Ensure directory exists. Safe to call repeatedly on the same path.
pub fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sanitize filename for filesystem
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b");

        ensure_dir_exists(&target).unwrap();
        ensure_dir_exists(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_under_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();

        assert!(ensure_dir_exists(&file.join("audio")).is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("AC/DC: Live?"), "AC_DC_ Live_");
        assert_eq!(sanitize_filename("  平凡之路  "), "平凡之路");
        assert_eq!(sanitize_filename("..."), "untitled");
        assert_eq!(sanitize_filename(""), "untitled");
    }
}
