//! Hashing utilities for name distinguishers and fingerprints.

use sha2::{Digest, Sha256};

/// Number of hex characters kept for a configuration hash distinguisher.
pub const SHORT_HASH_LEN: usize = 5;

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Add multiple strings to the fingerprint.
    pub fn update_strs<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for s in items {
            self.update_str(s);
        }
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return the first [`SHORT_HASH_LEN`] hex characters.
    pub fn finish_short(self) -> String {
        let mut hash = self.finish();
        hash.truncate(SHORT_HASH_LEN);
        hash
    }
}

/// Short hash of a list of strings, used as a last-resort name distinguisher.
pub fn short_hash<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let mut fp = Fingerprint::new();
    fp.update_strs(items);
    fp.finish_short()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        let mut fp = Fingerprint::new();
        fp.update_str("ios-sim-config");
        let hash = fp.finish();
        assert_eq!(hash.len(), 64);
        assert!(hash.starts_with(&short_hash(["ios-sim-config"])));
    }

    #[test]
    fn test_fingerprint_separates_components() {
        let joined = {
            let mut fp = Fingerprint::new();
            fp.update_strs(["ab", "c"]);
            fp.finish()
        };
        let split = {
            let mut fp = Fingerprint::new();
            fp.update_strs(["a", "bc"]);
            fp.finish()
        };

        assert_ne!(joined, split);
    }

    #[test]
    fn test_short_hash() {
        let hash = short_hash(["ios-sim-config", "ios-device-config"]);
        assert_eq!(hash.len(), SHORT_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, short_hash(["ios-sim-config", "ios-device-config"]));
        assert_ne!(hash, short_hash(["ios-device-config", "ios-sim-config"]));
    }
}
