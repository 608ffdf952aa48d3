use serde::{Deserialize, Serialize};

/// One byte range of an object's payload, destined to be uploaded as a
/// single part. Ranges are produced once per object and never mutated.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct PartRange {
    /// 0-based index of this part within the object.
    pub index: u32,
    pub offset: u64,
    pub length: u64,
}

impl PartRange {
    /// The 1-based part number the multipart protocol uses on the wire.
    pub fn part_number(&self) -> u32 {
        self.index + 1
    }

    /// Exclusive end offset of this range.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// A backend's acknowledgment of one uploaded part.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PartDescriptor {
    pub part_number: u32,
    pub etag: String,
}

/// Response metadata returned by the backend when a multipart upload
/// completes.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub status_code: u16,
    pub request_id: String,
    pub host_id: String,
}
