//! Content fingerprints — deterministic hashes used as derived identities.

use sha2::{Digest, Sha256};

/// Incremental content hasher producing a lowercase hex digest.
///
/// Field order is significant: hashing the same values in a different
/// order yields a different fingerprint.
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Start a new, empty fingerprint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feed one field into the fingerprint.
    #[must_use]
    pub fn field(mut self, value: impl AsRef<[u8]>) -> Self {
        self.hasher.update(value.as_ref());
        self
    }

    /// Finalize into the canonical lowercase hex form.
    #[must_use]
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}
