//! Image store contract and an in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Errors returned by an image store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    /// The store refused or failed to accept the upload.
    #[error("upload failed: {0}")]
    Upload(String),

    /// No image with this reference.
    #[error("image not found: {0}")]
    NotFound(String),

    /// The store could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ImageStoreError {
    /// Removal callers treat a missing image as already removed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ImageStoreError::NotFound(_))
    }
}

/// A picked file, before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// What the store returns for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Stored file name.
    pub filename: String,
    /// Stable reference used everywhere else (variant images, gallery, deletions).
    pub url: String,
}

impl StoredImage {
    pub fn reference(&self) -> &str {
        &self.url
    }
}

/// Binary image storage.
///
/// Uploads are never retried by callers; a failed upload is reported and the
/// pending field cleared.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store a blob and return its reference.
    async fn upload(&self, blob: &ImageBlob) -> Result<StoredImage, ImageStoreError>;

    /// Delete a stored image.
    async fn remove(&self, reference: &str) -> Result<(), ImageStoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    images: HashMap<String, ImageBlob>,
    uploads: u64,
    failures_pending: usize,
    removed: Vec<String>,
}

/// In-memory image store (for development/testing).
#[derive(Debug)]
pub struct InMemoryImageStore {
    base_url: String,
    state: Mutex<MemoryState>,
}

impl InMemoryImageStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Make the next `count` uploads fail.
    pub async fn fail_next_uploads(&self, count: usize) {
        self.state.lock().await.failures_pending = count;
    }

    pub async fn contains(&self, reference: &str) -> bool {
        self.state.lock().await.images.contains_key(reference)
    }

    /// Number of stored images.
    pub async fn len(&self) -> usize {
        self.state.lock().await.images.len()
    }

    /// References removed so far, in order.
    pub async fn removed(&self) -> Vec<String> {
        self.state.lock().await.removed.clone()
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new("memory://images")
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, blob: &ImageBlob) -> Result<StoredImage, ImageStoreError> {
        let mut state = self.state.lock().await;
        if state.failures_pending > 0 {
            state.failures_pending -= 1;
            return Err(ImageStoreError::Upload(format!(
                "rejected {}",
                blob.file_name
            )));
        }
        state.uploads += 1;
        let filename = format!("{}-{}", state.uploads, blob.file_name);
        let url = format!("{}/{}", self.base_url, filename);
        state.images.insert(url.clone(), blob.clone());
        Ok(StoredImage { filename, url })
    }

    async fn remove(&self, reference: &str) -> Result<(), ImageStoreError> {
        let mut state = self.state.lock().await;
        match state.images.remove(reference) {
            Some(_) => {
                state.removed.push(reference.to_string());
                Ok(())
            }
            None => Err(ImageStoreError::NotFound(reference.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(name: &str) -> ImageBlob {
        ImageBlob::new(name, "image/png", vec![0u8; 4])
    }

    #[tokio::test]
    async fn test_upload_then_remove() {
        let store = InMemoryImageStore::new("https://cdn.test/img");
        let stored = store.upload(&blob("red.png")).await.unwrap();
        assert_eq!(stored.reference(), "https://cdn.test/img/1-red.png");
        assert!(store.contains(stored.reference()).await);

        store.remove(stored.reference()).await.unwrap();
        assert_eq!(store.len().await, 0);
        let err = store.remove(stored.reference()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryImageStore::default();
        store.fail_next_uploads(1).await;
        assert!(matches!(
            store.upload(&blob("a.png")).await,
            Err(ImageStoreError::Upload(_))
        ));
        assert!(store.upload(&blob("a.png")).await.is_ok());
    }
}
