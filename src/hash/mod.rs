//! 64-bit keyed content hash primitive.
//!
//! Wraps [`blake3::Hasher`] (already the only hashing dependency this crate
//! needs) behind the `reset/write/write_u64/sum` contract the rest of the
//! engine is built on. Treated as opaque: callers never look inside a
//! fingerprint, only compare it for equality or feed it back into another
//! [`Primitive`] via [`Primitive::write_u64`].

use std::sync::OnceLock;

pub mod file_hash;

/// Default seed used everywhere except explicit `-fp`/test overrides.
pub const DEFAULT_SEED: u64 = 0;

fn key_from_seed(seed: u64) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key
}

/// Stateful 64-bit hash. One instance per file (sampled/full mode) or per
/// directory fold level; never shared across concurrent writers.
pub struct Primitive {
    seed: u64,
    hasher: blake3::Hasher,
}

impl Primitive {
    pub fn new(seed: u64) -> Self {
        Primitive {
            seed,
            hasher: blake3::Hasher::new_keyed(&key_from_seed(seed)),
        }
    }

    /// Zero state, restore the original seed.
    pub fn reset(&mut self) {
        self.hasher = blake3::Hasher::new_keyed(&key_from_seed(self.seed));
    }

    /// Feed bytes. Stream-stable: chunk boundaries never affect the result.
    pub fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Append the 8 little-endian bytes of `x`.
    pub fn write_u64(&mut self, x: u64) {
        self.hasher.update(&x.to_le_bytes());
    }

    /// Read current state without resetting.
    pub fn sum(&self) -> u64 {
        let digest = self.hasher.finalize();
        u64::from_le_bytes(digest.as_bytes()[..8].try_into().unwrap())
    }
}

/// Stateless convenience: `hash_once(b, 0)` equals `{ let mut p = Primitive::new(0); p.write(b); p.sum() }`.
pub fn hash_once(bytes: &[u8], seed: u64) -> u64 {
    let mut p = Primitive::new(seed);
    p.write(bytes);
    p.sum()
}

/// Canonical fingerprint of any zero-length file: `reset(); sum()` at the default seed.
pub fn zero_fingerprint() -> u64 {
    static Z: OnceLock<u64> = OnceLock::new();
    *Z.get_or_init(|| {
        let p = Primitive::new(DEFAULT_SEED);
        p.sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_once_matches_streamed() {
        let data = b"hello world";
        let streamed = {
            let mut p = Primitive::new(0);
            p.write(data);
            p.sum()
        };
        assert_eq!(hash_once(data, 0), streamed);
    }

    #[test]
    fn zero_fingerprint_is_stable() {
        let a = zero_fingerprint();
        let b = zero_fingerprint();
        assert_eq!(a, b);
    }

    #[test]
    fn write_u64_changes_state() {
        let mut p = Primitive::new(0);
        let before = p.sum();
        p.write_u64(42);
        assert_ne!(before, p.sum());
    }

    #[test]
    fn different_seeds_diverge() {
        let a = hash_once(b"same bytes", 0);
        let b = hash_once(b"same bytes", 1);
        assert_ne!(a, b);
    }
}
