use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug)]
pub enum FileReadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads a whole file into a byte buffer, ready to be stored as a blob
pub async fn read_as_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, FileReadError> {
    let path = path.as_ref();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| FileReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    trace!(?path, len = bytes.len(), "read file into bytes");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Write};

    use super::*;

    #[tokio::test]
    async fn reads_file_contents_as_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0xFF, 0x10, b'a']).unwrap();

        let bytes = read_as_bytes(file.path()).await.unwrap();

        assert_eq!(bytes, vec![0x00, 0xFF, 0x10, b'a']);
    }

    #[tokio::test]
    async fn reads_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        assert!(read_as_bytes(file.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reports_missing_file_with_its_path() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing.bin");

        let FileReadError::Io { path: reported, source } =
            read_as_bytes(&path).await.unwrap_err();

        assert_eq!(reported, path);
        assert_eq!(source.kind(), ErrorKind::NotFound);
    }
}
