use xxhash_rust::xxh3::{Xxh3, xxh3_64_with_seed};

use crate::codec::wire::{Wire, WireWriter};

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Seeded xxh3-64 over a byte slice. Used for payload checksums and shader source identity.
pub(crate) fn hash_bytes(bytes: &[u8]) -> u64 {
    xxh3_64_with_seed(bytes, XXH3_SEED)
}

/// Incremental, platform-stable hasher for cache fingerprints.
///
/// Structured values are fed in their wire encoding, so two inputs collide only if they encode
/// to the same bytes.
pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_bits().to_le_bytes());
    }

    pub(crate) fn write_opt_f32(&mut self, v: Option<f32>) {
        match v {
            Some(v) => {
                self.write_u8(1);
                self.write_f32(v);
            }
            None => self.write_u8(0),
        }
    }

    /// Feed `v` in its wire encoding.
    pub(crate) fn put<T: Wire>(&mut self, v: &T) {
        let mut w = WireWriter::new();
        w.put(v);
        self.write_bytes(&w.into_bytes());
    }

    pub(crate) fn finish(&self) -> u64 {
        self.inner.digest()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/hash.rs"]
mod tests;
