use bytes::Bytes;
use rand::RngCore;

/// Generates exactly `size` bytes of random object content.
pub fn random_payload(size: u64) -> Bytes {
    let mut data = vec![0u8; size as usize];
    rand::rng().fill_bytes(&mut data);
    Bytes::from(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size_contract() {
        assert_eq!(random_payload(0).len(), 0);
        assert_eq!(random_payload(300).len(), 300);
        assert_eq!(random_payload(65537).len(), 65537);
    }
}
