//! Integrity and checksum field normalization.
//!
//! The two dialects record content hashes differently. Yarn classic copies
//! npm's SRI `integrity` field: whitespace-separated `<algorithm>-<digest>`
//! tokens, plus the legacy single `sha1-<digest>` form inherited from
//! npm-shrinkwrap. Yarn berry writes a bare `checksum` field that is always
//! sha512. Both normalize to a map from lower-cased algorithm name to the
//! digests recorded for it, kept verbatim. Malformed tokens are skipped
//! rather than failing the record; a pin without a verifiable hash is still
//! a pin.

use std::collections::BTreeMap;

use tracing::debug;

/// Hash digests keyed by lower-cased algorithm name.
pub type AllowedHashes = BTreeMap<String, Vec<String>>;

/// Normalizes a yarn classic `integrity` field.
///
/// Each whitespace-separated token must split into exactly one algorithm
/// and one digest around a single `-`; anything else is skipped. An absent
/// field yields an empty map.
pub fn extract_integrity(field: Option<&str>) -> AllowedHashes {
    let mut hashes = AllowedHashes::new();
    let Some(field) = field else {
        return hashes;
    };
    for token in field.split_whitespace() {
        let mut parts = token.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(algorithm), Some(digest), None) if !algorithm.is_empty() && !digest.is_empty() => {
                hashes
                    .entry(algorithm.to_ascii_lowercase())
                    .or_default()
                    .push(digest.to_string());
            }
            _ => debug!(token, "skipping malformed integrity token"),
        }
    }
    hashes
}

/// Normalizes a yarn berry `checksum` field. Berry always hashes with
/// sha512, so the algorithm is implied.
pub fn extract_checksum(field: Option<&str>) -> AllowedHashes {
    match field {
        Some(checksum) if !checksum.is_empty() => {
            AllowedHashes::from([("sha512".to_string(), vec![checksum.to_string()])])
        }
        _ => AllowedHashes::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_integrity_legacy_sha1() {
        let hashes = extract_integrity(Some("sha1-XXXX"));
        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes["sha1"], vec!["XXXX".to_string()]);
    }

    #[test]
    fn test_extract_integrity_sri_sha512() {
        let hashes = extract_integrity(Some("sha512-aePbxDmcYW0="));
        assert_eq!(hashes["sha512"], vec!["aePbxDmcYW0=".to_string()]);
    }

    #[test]
    fn test_extract_integrity_multiple_tokens() {
        let hashes = extract_integrity(Some("sha1-XXXX sha512-YYYY"));
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes["sha1"], vec!["XXXX".to_string()]);
        assert_eq!(hashes["sha512"], vec!["YYYY".to_string()]);
    }

    #[test]
    fn test_extract_integrity_repeated_algorithm_appends() {
        let hashes = extract_integrity(Some("sha512-AAAA sha512-BBBB"));
        assert_eq!(hashes["sha512"], vec!["AAAA".to_string(), "BBBB".to_string()]);
    }

    #[test]
    fn test_extract_integrity_lowercases_algorithm() {
        let hashes = extract_integrity(Some("SHA1-XXXX"));
        assert_eq!(hashes["sha1"], vec!["XXXX".to_string()]);
    }

    #[test]
    fn test_extract_integrity_absent_is_empty() {
        assert!(extract_integrity(None).is_empty());
    }

    #[test]
    fn test_extract_integrity_malformed_tokens_skipped() {
        // No separator, too many separators, empty digest: all dropped.
        assert!(extract_integrity(Some("nodash")).is_empty());
        assert!(extract_integrity(Some("sha1-ab-cd")).is_empty());
        assert!(extract_integrity(Some("sha1-")).is_empty());
    }

    #[test]
    fn test_extract_integrity_keeps_valid_tokens_among_malformed() {
        let hashes = extract_integrity(Some("garbage sha1-XXXX"));
        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes["sha1"], vec!["XXXX".to_string()]);
    }

    #[test]
    fn test_extract_checksum_present() {
        let hashes = extract_checksum(Some("abcd1234"));
        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes["sha512"], vec!["abcd1234".to_string()]);
    }

    #[test]
    fn test_extract_checksum_absent_or_empty() {
        assert!(extract_checksum(None).is_empty());
        assert!(extract_checksum(Some("")).is_empty());
    }
}
