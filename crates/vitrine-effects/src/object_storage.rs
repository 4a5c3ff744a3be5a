//! In-memory object storage handler.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use vitrine_core::effects::{Clock, ObjectStorage};
use vitrine_core::{Result, VitrineError};

const URL_PREFIX: &str = "memory://vitrine/";

/// In-memory [`ObjectStorage`].
///
/// Keys follow the production scheme `folder/{timestamp}_{sanitized-name}`,
/// so two uploads of the same file land under distinct keys as long as the
/// clock moves between them.
#[derive(Clone)]
pub struct MemoryObjectStorage {
    clock: Arc<dyn Clock>,
    blobs: Arc<Mutex<BTreeMap<String, StoredBlob>>>,
}

struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

impl MemoryObjectStorage {
    /// An empty store stamping keys from the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            blobs: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Number of stored blobs (test inspection).
    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }

    /// Content type recorded for a public URL (test inspection).
    pub fn content_type_of(&self, public_url: &str) -> Option<String> {
        let key = public_url.strip_prefix(URL_PREFIX)?;
        self.blobs
            .lock()
            .get(key)
            .map(|blob| blob.content_type.clone())
    }

    /// Stored bytes behind a public URL (test inspection).
    pub fn bytes_of(&self, public_url: &str) -> Option<Vec<u8>> {
        let key = public_url.strip_prefix(URL_PREFIX)?;
        self.blobs.lock().get(key).map(|blob| blob.bytes.clone())
    }
}

/// Keep letters, digits, dots and dashes; everything else becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<String> {
        let key = format!(
            "{folder}/{}_{}",
            self.clock.now_ms(),
            sanitize_file_name(file_name)
        );
        self.blobs.lock().insert(
            key.clone(),
            StoredBlob {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(format!("{URL_PREFIX}{key}"))
    }

    async fn delete(&self, public_url: &str) -> Result<()> {
        let key = public_url
            .strip_prefix(URL_PREFIX)
            .ok_or_else(|| VitrineError::invalid(format!("not a stored URL: {public_url}")))?;
        match self.blobs.lock().remove(key) {
            Some(_) => Ok(()),
            None => Err(VitrineError::not_found(format!("no blob at {public_url}"))),
        }
    }
}
