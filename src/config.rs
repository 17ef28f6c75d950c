use std::path::PathBuf;

pub struct AppPaths {
    pub base_dir: PathBuf,
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
}

impl AppPaths {
    /// Resolves `~/.snoopdrop`, falling back to the working directory when no
    /// home directory is known.
    pub fn new() -> Self {
        let base = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".snoopdrop");
        Self::from_base(base)
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            db_path: base.join("snoopdrop.db"),
            export_dir: base.join("temp_files"),
            base_dir: base,
        }
    }

    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base() {
        let paths = AppPaths::from_base(PathBuf::from("/tmp/test-drop"));
        assert_eq!(paths.base_dir, PathBuf::from("/tmp/test-drop"));
        assert_eq!(paths.db_path, PathBuf::from("/tmp/test-drop/snoopdrop.db"));
        assert_eq!(paths.export_dir, PathBuf::from("/tmp/test-drop/temp_files"));
    }

    #[test]
    fn test_new_uses_dot_dir() {
        let paths = AppPaths::new();
        assert!(paths.base_dir.ends_with(".snoopdrop"));
    }

    #[test]
    fn test_with_db_path_keeps_export_dir() {
        let paths = AppPaths::from_base(PathBuf::from("/tmp/test-drop"))
            .with_db_path(PathBuf::from("final.db"));
        assert_eq!(paths.db_path, PathBuf::from("final.db"));
        assert_eq!(paths.export_dir, PathBuf::from("/tmp/test-drop/temp_files"));
    }
}
