use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{DropError, Result};
use crate::storage::models::Attachment;

/// Keeps only the final path component of a stored attachment name.
fn safe_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("attachment")
        .to_string()
}

/// Writes an attachment into `dir` as `temp_<name>` and returns the path.
pub fn export_attachment(dir: &Path, attachment: &Attachment) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("temp_{}", safe_file_name(&attachment.name)));
    fs::write(&path, &attachment.content)?;
    debug!(path = %path.display(), bytes = attachment.content.len(), "exported attachment");
    Ok(path)
}

/// Loads a file from disk as an attachment named after its base name.
pub fn read_attachment(path: &Path) -> Result<Attachment> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DropError::InvalidInput(format!("not a file path: {}", path.display())))?;
    let content = fs::read(path)?;
    Ok(Attachment::new(name, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_prefixed_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("temp_files");
        let path = export_attachment(&out, &Attachment::new("notes.txt", b"hi".to_vec())).unwrap();
        assert_eq!(path, out.join("temp_notes.txt"));
        assert_eq!(fs::read(&path).unwrap(), b"hi");
    }

    #[test]
    fn test_export_strips_directories() {
        let dir = TempDir::new().unwrap();
        let path =
            export_attachment(dir.path(), &Attachment::new("../../etc/passwd", b"x".to_vec())).unwrap();
        assert_eq!(path, dir.path().join("temp_passwd"));
    }

    #[test]
    fn test_export_falls_back_for_empty_name() {
        let dir = TempDir::new().unwrap();
        let path = export_attachment(dir.path(), &Attachment::new("..", b"x".to_vec())).unwrap();
        assert_eq!(path, dir.path().join("temp_attachment"));
    }

    #[test]
    fn test_read_attachment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        let attachment = read_attachment(&path).unwrap();
        assert_eq!(attachment.name, "photo.png");
        assert_eq!(attachment.content, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_attachment(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(DropError::Io(_))));
    }
}
