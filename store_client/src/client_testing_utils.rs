//! Instrumented `StorageClient` wrappers for exercising failure paths and
//! asserting on wire-level call sequences in tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use store_types::{ObjectKey, PartDescriptor, ResponseMetadata, UploadId};

use crate::error::{Result, StorageClientError};
use crate::interface::StorageClient;

/// Wraps a client and fails every `upload_part` call for the first `n`
/// distinct object keys it sees, then delegates normally. Session init and
/// completion always pass through. Keying the failures on objects rather
/// than individual calls keeps batch-level tests deterministic even when
/// sibling part tasks are cancelled mid-flight.
pub struct FailingClient {
    inner: Arc<dyn StorageClient>,
    objects_to_fail: usize,
    failing_keys: Mutex<HashSet<ObjectKey>>,
}

impl FailingClient {
    pub fn fail_parts_for_first_objects(inner: Arc<dyn StorageClient>, n: usize) -> Self {
        Self {
            inner,
            objects_to_fail: n,
            failing_keys: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl StorageClient for FailingClient {
    async fn init_multipart(&self, bucket: &str, key: &ObjectKey) -> Result<UploadId> {
        self.inner.init_multipart(bucket, key).await
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        part_number: u32,
        data: Bytes,
    ) -> Result<PartDescriptor> {
        let should_fail = {
            let mut keys = self.failing_keys.lock().expect("failing_keys lock poisoned");
            if keys.contains(key) {
                true
            } else if keys.len() < self.objects_to_fail {
                keys.insert(key.clone());
                true
            } else {
                false
            }
        };

        if should_fail {
            return Err(StorageClientError::Other(format!(
                "injected failure uploading part {part_number} of {key}"
            )));
        }
        self.inner.upload_part(bucket, key, upload_id, part_number, data).await
    }

    async fn complete_multipart(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        parts: &[PartDescriptor],
    ) -> Result<ResponseMetadata> {
        self.inner.complete_multipart(bucket, key, upload_id, parts).await
    }
}

/// Wraps a client and records the part-number list passed to every
/// `complete_multipart` call, in call order.
pub struct RecordingClient {
    inner: Arc<dyn StorageClient>,
    completions: Mutex<Vec<Vec<u32>>>,
}

impl RecordingClient {
    pub fn new(inner: Arc<dyn StorageClient>) -> Self {
        Self {
            inner,
            completions: Mutex::new(Vec::new()),
        }
    }

    /// Part numbers seen by each completion call so far.
    pub fn completions(&self) -> Vec<Vec<u32>> {
        self.completions.lock().expect("completions lock poisoned").clone()
    }
}

#[async_trait]
impl StorageClient for RecordingClient {
    async fn init_multipart(&self, bucket: &str, key: &ObjectKey) -> Result<UploadId> {
        self.inner.init_multipart(bucket, key).await
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        part_number: u32,
        data: Bytes,
    ) -> Result<PartDescriptor> {
        self.inner.upload_part(bucket, key, upload_id, part_number, data).await
    }

    async fn complete_multipart(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        parts: &[PartDescriptor],
    ) -> Result<ResponseMetadata> {
        self.completions
            .lock()
            .expect("completions lock poisoned")
            .push(parts.iter().map(|p| p.part_number).collect());
        self.inner.complete_multipart(bucket, key, upload_id, parts).await
    }
}
