#![cfg_attr(feature = "strict", deny(warnings))]

pub use crate::error::{Result, StorageClientError};
pub use client_testing_utils::{FailingClient, RecordingClient};
pub use interface::StorageClient;
pub use local_client::LocalClient;

mod client_testing_utils;
mod error;
mod interface;
mod local_client;
