//! Object storage contract.

use crate::errors::Result;
use async_trait::async_trait;

/// Blob storage for uploaded assets (images, mostly).
///
/// Keys are derived by the handler (folder, timestamp, sanitized file name)
/// so two uploads of the same file never collide.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload a blob and return its public URL.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<String>;

    /// Delete the blob behind a public URL previously returned by `upload`.
    async fn delete(&self, public_url: &str) -> Result<()>;
}

#[async_trait]
impl<T: ObjectStorage + ?Sized> ObjectStorage for std::sync::Arc<T> {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<String> {
        (**self).upload(bytes, file_name, content_type, folder).await
    }

    async fn delete(&self, public_url: &str) -> Result<()> {
        (**self).delete(public_url).await
    }
}
