use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The key of one object in a bucket: a caller-supplied prefix followed by a
/// random UUID, so concurrent runs never collide on object names.
#[derive(Debug, PartialEq, Serialize, Deserialize, Ord, PartialOrd, Eq, Hash, Clone)]
pub struct ObjectKey {
    pub prefix: String,
    pub id: Uuid,
}

impl ObjectKey {
    /// Generates a fresh key under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            id: Uuid::new_v4(),
        }
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, self.id)
    }
}

/// The opaque token a backend hands out when a multipart upload session is
/// initiated. Scopes every part upload and the final completion call to one
/// eventual object.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct UploadId(pub String);

impl Display for UploadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
