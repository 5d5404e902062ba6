//! Page key derivation

/// Key of page `index` for `base`
pub fn page_key(base: &str, index: usize) -> String {
    format!("{}_{}", base, index)
}

/// Key of the manifest page (index 0)
pub fn manifest_key(base: &str) -> String {
    page_key(base, 0)
}

/// Keys of payload pages 1..=count, in order
pub fn payload_keys(base: &str, count: usize) -> Vec<String> {
    (1..=count).map(|index| page_key(base, index)).collect()
}
