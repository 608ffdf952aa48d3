use std::sync::Arc;

use bytes::Bytes;
use store_client::StorageClient;
use store_types::{ObjectKey, PartDescriptor, ResponseMetadata};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::errors::{LoadTestError, Result};
use crate::event_pipeline::{EventLogger, Severity};
use crate::part_splitter::split_into_parts;

/// Everything the batch driver needs to report one successfully placed
/// object.
#[derive(Debug, Clone)]
pub struct CompletedObject {
    pub key: ObjectKey,
    pub metadata: ResponseMetadata,
    pub bytes_uploaded: u64,
}

/// Owns the lifecycle of one object at a time: session initiation, parallel
/// part upload, descriptor reassembly, and session completion.
///
/// Parts of one object upload concurrently through a pool with one slot per
/// part, so no part ever waits behind another object's parts. Any single
/// part failure abandons the object: remaining part tasks are dropped with
/// the [`JoinSet`], and the half-open session is left behind without an
/// explicit abort call to the backend.
pub struct ObjectUploader {
    bucket: String,
    key_prefix: String,
    part_count: u32,
    client: Arc<dyn StorageClient>,
    logger: EventLogger,
}

impl ObjectUploader {
    pub fn new(
        bucket: String,
        key_prefix: String,
        part_count: u32,
        client: Arc<dyn StorageClient>,
        logger: EventLogger,
    ) -> Self {
        Self {
            bucket,
            key_prefix,
            part_count,
            client,
            logger,
        }
    }

    /// Uploads one object with a freshly generated key, returning its
    /// completion metadata. Errors cover a single object only; the caller
    /// decides whether the batch continues.
    pub async fn upload_object(&self, payload: Bytes) -> Result<CompletedObject> {
        let key = ObjectKey::new(&self.key_prefix);
        self.logger
            .emit(Severity::Info, format!("Generated object key: {key}"))
            .await;
        self.logger
            .emit(Severity::Debug, format!("Generated object content of size: {}", payload.len()))
            .await;

        let upload_id = self
            .client
            .init_multipart(&self.bucket, &key)
            .await
            .map_err(LoadTestError::SessionInitError)?;
        self.logger
            .emit(Severity::Info, format!("POST - Initiated multi-part upload for object {key}"))
            .await;

        let ranges = split_into_parts(payload.len() as u64, self.part_count)?;

        // One permit per part: the pool is bounded but never makes a part of
        // this object wait.
        let upload_permits = Arc::new(Semaphore::new(ranges.len()));
        let mut upload_tasks: JoinSet<Result<(PartDescriptor, u64)>> = JoinSet::new();

        for range in ranges {
            let permit = upload_permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| LoadTestError::UploadTaskError(e.to_string()))?;

            let client = self.client.clone();
            let bucket = self.bucket.clone();
            let key = key.clone();
            let upload_id = upload_id.clone();
            let data = payload.slice(range.offset as usize..range.end() as usize);

            upload_tasks.spawn(async move {
                let descriptor = client
                    .upload_part(&bucket, &key, &upload_id, range.part_number(), data)
                    .await
                    .map_err(LoadTestError::PartUploadError)?;
                drop(permit);
                Ok((descriptor, range.length))
            });
        }

        let mut parts = Vec::with_capacity(self.part_count as usize);
        let mut bytes_uploaded = 0u64;
        while let Some(joined) = upload_tasks.join_next().await {
            let (descriptor, length) = joined??;
            self.logger
                .emit(
                    Severity::Info,
                    format!(
                        "PUT - Uploaded part {} of size {length} for object {key}",
                        descriptor.part_number
                    ),
                )
                .await;
            bytes_uploaded += length;
            parts.push(descriptor);
        }

        // Workers join in completion order; the backend requires strictly
        // ascending, gapless part numbers at completion time.
        parts.sort_by_key(|p| p.part_number);

        let metadata = self
            .client
            .complete_multipart(&self.bucket, &key, &upload_id, &parts)
            .await
            .map_err(LoadTestError::CompletionError)?;
        self.logger
            .emit(Severity::Info, format!("POST - Completed multi-part upload for object {key}"))
            .await;
        self.logger
            .emit(Severity::Debug, format!("Response: {metadata:?}"))
            .await;

        debug!("Object {key} completed: {bytes_uploaded} bytes over {} parts", parts.len());

        Ok(CompletedObject {
            key,
            metadata,
            bytes_uploaded,
        })
    }
}
