//! Artifact output.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::GenerationError;

/// Writes `contents` to a file that must not exist yet.
///
/// # Errors
///
/// Returns [`GenerationError::OutputExists`] if `path` exists, or
/// [`GenerationError::Io`] if it cannot be created or written.
pub fn write_new_file(path: &Path, contents: &str) -> Result<(), GenerationError> {
    let io_error = |source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(GenerationError::OutputExists(path.to_path_buf()))
        }
        Err(e) => return Err(io_error(e)),
    };
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn writes_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        write_new_file(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.xsd");
        std::fs::write(&path, "keep me").unwrap();
        let err = write_new_file(&path, "<xs:schema/>").unwrap_err();
        assert!(matches!(err, GenerationError::OutputExists(ref p) if *p == path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("schema.json");
        assert!(matches!(
            write_new_file(&path, "{}"),
            Err(GenerationError::Io { .. })
        ));
    }
}
