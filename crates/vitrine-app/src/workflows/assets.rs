//! Asset library operations over object storage.

use crate::errors::AppError;
use std::sync::Arc;
use vitrine_core::effects::ObjectStorage;

/// Uploads and removes media assets.
///
/// Uploads surface their failures (the editor is waiting on the URL);
/// deletes are best-effort, since a leaked blob is preferable to blocking
/// the user on cleanup.
pub struct AssetWorkflow {
    storage: Arc<dyn ObjectStorage>,
}

impl AssetWorkflow {
    /// Wrap a storage handler.
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Upload a blob and return its public URL.
    pub async fn upload_asset(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::input("Empty file", "Pick a non-empty file"));
        }
        self.storage
            .upload(bytes, file_name, content_type, folder)
            .await
            .map_err(|err| AppError::action("Upload asset", err))
    }

    /// Remove a previously uploaded blob. Failures are logged, never
    /// surfaced.
    pub async fn delete_asset(&self, public_url: &str) {
        if let Err(err) = self.storage.delete(public_url).await {
            tracing::warn!(url = %public_url, error = %err, "asset delete skipped");
        }
    }
}
