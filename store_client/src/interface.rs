use bytes::Bytes;
use store_types::{ObjectKey, PartDescriptor, ResponseMetadata, UploadId};

use crate::error::Result;

/// A client to an object-storage backend, exposing the three operations of
/// the multipart-upload protocol:
/// 1. initiate an upload session for one object
/// 2. upload individual parts under that session
/// 3. complete the session with the full list of part acknowledgments
///
/// Implementations must be safe for concurrent independent calls; part
/// uploads for one object run in parallel against a shared client.
#[async_trait::async_trait]
pub trait StorageClient: Send + Sync {
    /// Begin a multipart upload session for `key`, returning the opaque
    /// upload id that scopes all subsequent calls for this object.
    async fn init_multipart(&self, bucket: &str, key: &ObjectKey) -> Result<UploadId>;

    /// Upload one part under an open session. `part_number` is 1-based.
    async fn upload_part(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        part_number: u32,
        data: Bytes,
    ) -> Result<PartDescriptor>;

    /// Finalize the session. `parts` must be strictly ascending and gapless
    /// by part number starting at 1; backends reject anything else.
    async fn complete_multipart(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        parts: &[PartDescriptor],
    ) -> Result<ResponseMetadata>;
}
