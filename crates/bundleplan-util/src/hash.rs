/// Length of the abbreviated fingerprint shown in human output.
pub const SHORT_LEN: usize = 12;

/// BLAKE3 digest of `data`, hex-encoded.
#[must_use]
pub fn fingerprint(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// First [`SHORT_LEN`] hex characters of a full fingerprint.
#[must_use]
pub fn short(fingerprint: &str) -> &str {
    fingerprint.get(..SHORT_LEN).unwrap_or(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_value() {
        // BLAKE3("hello world")
        assert_eq!(
            fingerprint(b"hello world"),
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn test_fingerprint_differs_on_input() {
        assert_ne!(fingerprint(b"development"), fingerprint(b"production"));
    }

    #[test]
    fn test_short_truncates() {
        let full = fingerprint(b"plan");
        assert_eq!(short(&full).len(), SHORT_LEN);
        assert!(full.starts_with(short(&full)));
        assert_eq!(short("abc"), "abc");
    }
}
