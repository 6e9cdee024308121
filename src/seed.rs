//! Deterministic per-configuration seed derivation.
//!
//! Not cryptographic. The only requirement is that the same `(base, epsilon)`
//! pair always yields the same seed on every platform, independently of where
//! the configuration sits in a sweep or which thread runs it.

/// Seed for the run that evaluates `epsilon` under a sweep seeded with `base`.
///
/// FNV-1a over the little-endian bit pattern of `epsilon`, mixed with `base`
/// through a SplitMix64 finalizer. `0.0` and `-0.0` map to the same seed.
#[must_use]
pub fn derive_seed(base: u64, epsilon: f64) -> u64 {
    // Normalize -0.0 so it does not get a seed of its own.
    let bits = if epsilon == 0.0 { 0u64 } else { epsilon.to_bits() };
    let mut h: u64 = 14695981039346656037u64;
    for b in bits.to_le_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(1099511628211u64);
    }

    // SplitMix64 finalizer: one golden-ratio step, then two xor-shift-multiply rounds.
    let mut z = (base ^ h).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
