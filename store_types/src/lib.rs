pub use key::{ObjectKey, UploadId};
pub use parts::{PartDescriptor, PartRange, ResponseMetadata};

mod key;
mod parts;
