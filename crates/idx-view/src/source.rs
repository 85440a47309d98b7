//! Where raw tensor bytes and mismatch lists come from.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FetchError;

/// Bulk fetch of one named resource.
///
/// Implementations do not retry and define no timeout.
#[allow(async_fn_in_trait)]
pub trait Source {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, FetchError>;
}

/// Serves resources as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for DirSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.root.join(resource);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), len = bytes.len(), "fetched resource");
                Ok(bytes)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(FetchError::NotFound {
                resource: resource.to_string(),
            }),
            Err(source) => Err(FetchError::Io {
                resource: resource.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_files_below_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test-images"), [0, 0, 8, 0]).unwrap();
        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch("test-images").await.unwrap(), vec![0, 0, 8, 0]);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        match source.fetch("incorrect_predictions").await {
            Err(FetchError::NotFound { resource }) => assert_eq!(resource, "incorrect_predictions"),
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
