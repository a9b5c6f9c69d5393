//! Deterministic seeds derived from test names.

use sha2::{Digest, Sha256};

const SEED_MODULUS: u64 = 100_000_000;

/// Returns a seed function for the named test source.
///
/// The base seed is the SHA-256 digest of `s`, read as one big-endian integer
/// and reduced modulo 10^8; the returned closure adds an offset to it. Tests
/// sharing a source pass distinct small offsets to get distinct, reproducible
/// seeds and therefore distinct topic names.
///
/// ```
/// use kafka_testing::nb_safe_seed;
///
/// let seed = nb_safe_seed("test_a");
/// assert_eq!(seed(0), 9_786_370);
/// assert_eq!(seed(1), seed(0) + 1);
/// ```
pub fn nb_safe_seed(s: &str) -> impl Fn(u64) -> u64 {
    let digest = Sha256::digest(s.as_bytes());
    let base = digest
        .iter()
        .fold(0u64, |acc, &byte| (acc * 256 + u64::from(byte)) % SEED_MODULUS);
    move |offset| base + offset
}
