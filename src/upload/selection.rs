use super::types::FileHandle;
use crate::config::SelectionConfig;
use crate::error::SelectionError;
use ignore::Walk;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Advisory filter applied before a file enters the registry.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    allowed_extensions: Vec<String>,
    max_file_size: u64,
}

impl SelectionPolicy {
    pub fn new(allowed_extensions: &[String], max_file_size: u64) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            max_file_size,
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(&config.allowed_extensions, config.max_file_size_bytes())
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| self.allowed_extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Reads one file into an immutable handle, or explains why it was refused.
    pub fn load(&self, path: &Path) -> Result<FileHandle, SelectionError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        if !self.is_supported(path) {
            return Err(SelectionError::Unsupported {
                name,
                extension: extension_of(path).unwrap_or_default(),
            });
        }

        let read_error = |source| SelectionError::Read {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(read_error)?.len();
        if size > self.max_file_size {
            return Err(SelectionError::TooLarge {
                name,
                size,
                limit: self.max_file_size,
            });
        }

        let bytes = fs::read(path).map_err(read_error)?;
        let mime = mime_for(path);
        debug!(%name, size, mime, "Loaded file");
        Ok(FileHandle::new(name, path, mime, bytes))
    }

    pub fn load_all<'a, I>(&self, paths: I) -> (Vec<FileHandle>, Vec<SelectionError>)
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for path in paths {
            match self.load(path) {
                Ok(handle) => accepted.push(handle),
                Err(e) => rejected.push(e),
            }
        }
        (accepted, rejected)
    }

    /// Walks a folder (honouring ignore files) and loads every supported document.
    /// Unsupported files are skipped silently; oversized or unreadable ones are reported.
    pub fn load_folder(&self, folder: &Path) -> (Vec<FileHandle>, Vec<SelectionError>) {
        let mut paths: Vec<_> = Walk::new(folder)
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && self.is_supported(path))
            .collect();
        paths.sort();
        self.load_all(paths.iter().map(|p| p.as_path()))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

pub fn mime_for(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("tiff") | Some("tif") => "image/tiff",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionConfig;
    use tempfile::tempdir;

    fn policy() -> SelectionPolicy {
        SelectionPolicy::from_config(&SelectionConfig::default())
    }

    #[test]
    fn test_load_supported_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Claim.PDF");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let handle = policy().load(&path).unwrap();
        assert_eq!(handle.name, "Claim.PDF");
        assert_eq!(handle.mime, "application/pdf");
        assert_eq!(handle.size(), 8);
        assert!(!handle.is_image());
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        match policy().load(&path) {
            Err(SelectionError::Unsupported { name, extension }) => {
                assert_eq!(name, "notes.txt");
                assert_eq!(extension, "txt");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.png");
        fs::write(&path, vec![0u8; 64]).unwrap();

        let small = SelectionPolicy::new(&["png".to_string()], 16);
        assert!(matches!(
            small.load(&path),
            Err(SelectionError::TooLarge { size: 64, limit: 16, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        assert!(matches!(policy().load(&path), Err(SelectionError::Read { .. })));
    }

    #[test]
    fn test_load_folder_skips_unsupported() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.docx"), b"docx").unwrap();
        fs::write(dir.path().join("a.jpg"), b"jpg").unwrap();
        fs::write(dir.path().join("readme.md"), b"md").unwrap();
        fs::write(dir.path().join("nested").join("c.tiff"), b"tiff").unwrap();

        let (accepted, rejected) = policy().load_folder(dir.path());
        let names: Vec<&str> = accepted.iter().map(|h| h.name.as_str()).collect();

        assert_eq!(names, vec!["a.jpg", "b.docx", "c.tiff"]);
        assert!(rejected.is_empty());
        assert!(accepted[0].is_image());
    }
}
