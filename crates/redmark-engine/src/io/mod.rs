use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a UTF-8 input file.
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write an output file, creating parent directories if needed.
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::write(path, content).map_err(IoError::Io)
}

/// Copy the original document through unchanged, used when the diff finds
/// nothing to redline.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), IoError> {
    if !from.exists() {
        return Err(IoError::NotFound(from.to_path_buf()));
    }
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::copy(from, to).map_err(IoError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(&dir.path().join("absent.xml"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.xml");
        write_file(&path, "<w:p/>").unwrap();
        assert_eq!(read_file(&path).unwrap(), "<w:p/>");
    }

    #[test]
    fn copy_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("orig.xml");
        let to = dir.path().join("copy.xml");
        write_file(&from, "exact content ").unwrap();
        copy_file(&from, &to).unwrap();
        assert_eq!(read_file(&to).unwrap(), "exact content ");
    }
}
