use store_types::PartRange;

use crate::errors::{LoadTestError, Result};

/// Splits `total_size` payload bytes into `part_count` contiguous ranges.
///
/// Every range, including the last, has length `total_size / part_count`
/// (truncating division). When `total_size` is not evenly divisible the
/// remainder bytes are dropped and the uploaded object comes out smaller
/// than requested. This is a known deviation from "upload exactly N bytes"
/// that the rest of the tool (and its tests) depend on observing, so it is
/// kept rather than carrying the remainder into the last part.
pub fn split_into_parts(total_size: u64, part_count: u32) -> Result<Vec<PartRange>> {
    if part_count == 0 {
        return Err(LoadTestError::ConfigurationError(
            "part count must be positive".to_string(),
        ));
    }

    let base_size = total_size / part_count as u64;

    Ok((0..part_count)
        .map(|index| PartRange {
            index,
            offset: index as u64 * base_size,
            length: base_size,
        })
        .collect())
}
