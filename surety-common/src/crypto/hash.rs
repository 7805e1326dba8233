use sha2::{Digest, Sha256};

/// Incremental hasher over length-prefixed fields.
///
/// Each field is written as its little-endian `u64` length followed by the
/// bytes, so `("AB", "C")` and `("A", "BC")` never produce the same input.
#[derive(Default)]
pub struct FieldHasher {
    inner: Sha256,
}

impl FieldHasher {
    pub fn new() -> Self {
        Self { inner: Sha256::new() }
    }

    pub fn field(mut self, bytes: &[u8]) -> Self {
        self.inner.update((bytes.len() as u64).to_le_bytes());
        self.inner.update(bytes);
        self
    }

    pub fn str(self, s: &str) -> Self {
        self.field(s.as_bytes())
    }

    pub fn u64(self, v: u64) -> Self {
        self.field(&v.to_le_bytes())
    }

    pub fn finish(self) -> [u8; 32] {
        self.inner.finalize().into()
    }

    pub fn finish_hex(self) -> String {
        hex::encode(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        let a = FieldHasher::new().str("AB").str("C").finish_hex();
        let b = FieldHasher::new().str("A").str("BC").finish_hex();
        assert_ne!(a, b);
    }
}
