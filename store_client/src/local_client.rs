use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use store_types::{ObjectKey, PartDescriptor, ResponseMetadata, UploadId};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, StorageClientError};
use crate::interface::StorageClient;

/// Directory under the store root holding in-flight multipart sessions.
const STAGING_DIR: &str = ".multipart";

/// `LocalClient` is a disk-backed storage backend: parts are staged under
/// `{root}/.multipart/{upload_id}/` and assembled into `{root}/{bucket}/{key}`
/// on completion. All session state lives on the filesystem, so the client
/// itself is stateless and safe to share across tasks.
#[derive(Debug)]
pub struct LocalClient {
    root: PathBuf,
}

impl LocalClient {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join(STAGING_DIR))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the staging directory for one session.
    fn session_dir(&self, upload_id: &UploadId) -> PathBuf {
        self.root.join(STAGING_DIR).join(&upload_id.0)
    }

    /// Path of one staged part within a session directory.
    fn part_path(session_dir: &Path, part_number: u32) -> PathBuf {
        session_dir.join(format!("{part_number:05}.part"))
    }

    /// Final on-disk location of an assembled object.
    pub fn object_path(&self, bucket: &str, key: &ObjectKey) -> PathBuf {
        self.root.join(bucket).join(key.to_string())
    }

    fn etag_for(data: &[u8]) -> String {
        let digest = Sha256::digest(data);
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[async_trait]
impl StorageClient for LocalClient {
    async fn init_multipart(&self, bucket: &str, key: &ObjectKey) -> Result<UploadId> {
        if bucket.is_empty() {
            return Err(StorageClientError::InvalidArguments);
        }

        let upload_id = UploadId(Uuid::new_v4().to_string());
        let session_dir = self.session_dir(&upload_id);
        std::fs::create_dir(&session_dir)?;

        info!("Initiated multipart session {upload_id} for {bucket}/{key} at {session_dir:?}");
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        _bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        part_number: u32,
        data: Bytes,
    ) -> Result<PartDescriptor> {
        if part_number == 0 {
            return Err(StorageClientError::InvalidArguments);
        }

        let session_dir = self.session_dir(upload_id);
        if !session_dir.is_dir() {
            return Err(StorageClientError::UploadSessionNotFound(upload_id.to_string()));
        }

        // Stage through a tempfile and persist, so a crashed upload never
        // leaves a readable half-written part behind.
        let tempfile = tempfile::Builder::new()
            .prefix(&format!("{}.", std::process::id()))
            .suffix(".part")
            .tempfile_in(&session_dir)
            .map_err(|e| {
                StorageClientError::InternalError(anyhow!("Unable to create temporary file for staging part: {e:?}"))
            })?;

        {
            let mut writer = BufWriter::new(&tempfile);
            writer.write_all(&data)?;
            writer.flush()?;
        }

        let part_path = Self::part_path(&session_dir, part_number);
        tempfile.persist(&part_path).map_err(|e| e.error)?;

        let etag = Self::etag_for(&data);
        debug!("Staged part {part_number} ({} bytes) of {key} to {part_path:?}", data.len());

        Ok(PartDescriptor { part_number, etag })
    }

    async fn complete_multipart(
        &self,
        bucket: &str,
        key: &ObjectKey,
        upload_id: &UploadId,
        parts: &[PartDescriptor],
    ) -> Result<ResponseMetadata> {
        let session_dir = self.session_dir(upload_id);
        if !session_dir.is_dir() {
            return Err(StorageClientError::UploadSessionNotFound(upload_id.to_string()));
        }
        if parts.is_empty() {
            return Err(StorageClientError::InvalidArguments);
        }

        // Hard protocol invariant: part numbers must be 1..=n, strictly
        // ascending with no gaps or duplicates.
        for (i, part) in parts.iter().enumerate() {
            if part.part_number != i as u32 + 1 {
                return Err(StorageClientError::PartOrderViolation(format!(
                    "expected part {} at position {i}, got part {}",
                    i + 1,
                    part.part_number
                )));
            }
        }

        let object_path = self.object_path(bucket, key);
        if let Some(parent) = object_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tempfile = tempfile::Builder::new()
            .prefix(&format!("{}.", std::process::id()))
            .suffix(".object")
            .tempfile_in(self.root.join(STAGING_DIR))
            .map_err(|e| {
                StorageClientError::InternalError(anyhow!("Unable to create temporary file for assembly: {e:?}"))
            })?;

        {
            let mut writer = BufWriter::new(&tempfile);
            for part in parts {
                let part_path = Self::part_path(&session_dir, part.part_number);
                let mut file = File::open(&part_path)
                    .map_err(|_| StorageClientError::PartNotFound(part.part_number))?;

                let mut data = Vec::new();
                file.read_to_end(&mut data)?;

                if Self::etag_for(&data) != part.etag {
                    return Err(StorageClientError::EtagMismatch(part.part_number));
                }
                writer.write_all(&data)?;
            }
            writer.flush()?;
        }

        tempfile.persist(&object_path).map_err(|e| e.error)?;
        std::fs::remove_dir_all(&session_dir)?;

        info!("Completed multipart session {upload_id}; assembled {bucket}/{key} at {object_path:?}");

        Ok(ResponseMetadata {
            status_code: 200,
            request_id: Uuid::new_v4().to_string(),
            host_id: format!("local-store/{}", self.root.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;
    use tempfile::TempDir;

    use super::*;

    fn gen_random_bytes(len: usize) -> Bytes {
        let mut data = vec![0u8; len];
        rand::rng().fill_bytes(&mut data);
        Bytes::from(data)
    }

    #[tokio::test]
    async fn test_multipart_roundtrip() {
        let tmp_dir = TempDir::new().unwrap();
        let client = LocalClient::new(tmp_dir.path()).unwrap();

        let key = ObjectKey::new("test-");
        let data = gen_random_bytes(300);

        let upload_id = client.init_multipart("bucket", &key).await.unwrap();

        let mut parts = Vec::new();
        for i in 0..4u32 {
            let chunk = data.slice((i as usize) * 75..(i as usize + 1) * 75);
            let part = client
                .upload_part("bucket", &key, &upload_id, i + 1, chunk)
                .await
                .unwrap();
            parts.push(part);
        }

        let metadata = client
            .complete_multipart("bucket", &key, &upload_id, &parts)
            .await
            .unwrap();
        assert_eq!(metadata.status_code, 200);
        assert!(!metadata.request_id.is_empty());

        let assembled = std::fs::read(client.object_path("bucket", &key)).unwrap();
        assert_eq!(assembled, data.as_ref());

        // Staging dir cleaned up after completion.
        assert!(!client.session_dir(&upload_id).exists());
    }

    #[tokio::test]
    async fn test_parts_staged_out_of_order_assemble_in_order() {
        let tmp_dir = TempDir::new().unwrap();
        let client = LocalClient::new(tmp_dir.path()).unwrap();

        let key = ObjectKey::new("");
        let upload_id = client.init_multipart("b", &key).await.unwrap();

        let p3 = client
            .upload_part("b", &key, &upload_id, 3, Bytes::from_static(b"cc"))
            .await
            .unwrap();
        let p1 = client
            .upload_part("b", &key, &upload_id, 1, Bytes::from_static(b"aa"))
            .await
            .unwrap();
        let p2 = client
            .upload_part("b", &key, &upload_id, 2, Bytes::from_static(b"bb"))
            .await
            .unwrap();

        client
            .complete_multipart("b", &key, &upload_id, &[p1, p2, p3])
            .await
            .unwrap();

        let assembled = std::fs::read(client.object_path("b", &key)).unwrap();
        assert_eq!(assembled, b"aabbcc");
    }

    #[tokio::test]
    async fn test_completion_rejects_gaps_and_reordering() {
        let tmp_dir = TempDir::new().unwrap();
        let client = LocalClient::new(tmp_dir.path()).unwrap();

        let key = ObjectKey::new("");
        let upload_id = client.init_multipart("b", &key).await.unwrap();

        let p1 = client
            .upload_part("b", &key, &upload_id, 1, Bytes::from_static(b"aa"))
            .await
            .unwrap();
        let p2 = client
            .upload_part("b", &key, &upload_id, 2, Bytes::from_static(b"bb"))
            .await
            .unwrap();

        let out_of_order = client
            .complete_multipart("b", &key, &upload_id, &[p2.clone(), p1.clone()])
            .await;
        assert_eq!(
            out_of_order.unwrap_err(),
            StorageClientError::PartOrderViolation(String::new())
        );

        let gapped = client
            .complete_multipart("b", &key, &upload_id, &[p2])
            .await;
        assert_eq!(
            gapped.unwrap_err(),
            StorageClientError::PartOrderViolation(String::new())
        );
    }

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let tmp_dir = TempDir::new().unwrap();
        let client = LocalClient::new(tmp_dir.path()).unwrap();

        let key = ObjectKey::new("");
        let bogus = UploadId("no-such-session".to_string());

        let result = client
            .upload_part("b", &key, &bogus, 1, Bytes::from_static(b"aa"))
            .await;
        assert_eq!(
            result.unwrap_err(),
            StorageClientError::UploadSessionNotFound(String::new())
        );
    }

    #[tokio::test]
    async fn test_missing_part_rejected_at_completion() {
        let tmp_dir = TempDir::new().unwrap();
        let client = LocalClient::new(tmp_dir.path()).unwrap();

        let key = ObjectKey::new("");
        let upload_id = client.init_multipart("b", &key).await.unwrap();

        let p1 = client
            .upload_part("b", &key, &upload_id, 1, Bytes::from_static(b"aa"))
            .await
            .unwrap();
        // Part 2 claimed but never uploaded.
        let phantom = PartDescriptor {
            part_number: 2,
            etag: p1.etag.clone(),
        };

        let result = client
            .complete_multipart("b", &key, &upload_id, &[p1, phantom])
            .await;
        assert_eq!(result.unwrap_err(), StorageClientError::PartNotFound(2));
    }
}
