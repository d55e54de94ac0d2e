use std::path::Path;

/// Renders host paths for messages: canonical when the path exists,
/// otherwise made absolute against the process working directory.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> BestEffortPathExt for P {
    fn best_effort_path_display(&self) -> String {
        let path = self.as_ref();
        path.canonicalize()
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn existing_paths_are_canonicalized() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dotted = temp_dir.path().join(".").join("ufs.json");
        std::fs::write(&dotted, "{}").expect("Failed to write file");

        let canonical = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp directory")
            .join("ufs.json");
        assert_eq!(dotted.best_effort_path_display(), canonical.display().to_string());
    }

    #[test]
    fn missing_paths_are_made_absolute() {
        let rendered = PathBuf::from("missing/store.json").best_effort_path_display();
        assert!(Path::new(&rendered).is_absolute());
        assert!(rendered.ends_with("store.json"));
    }
}
