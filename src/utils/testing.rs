//! Deterministic noise shared by unit tests.

/// Uniform noise on `[-0.5, 0.5)` from a splitmix64 hash of `(t, stream)`.
pub(crate) fn noise(t: usize, stream: u64) -> f64 {
    let mut z = (t as u64)
        .wrapping_add(stream << 32)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64 - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_bounded_and_repeatable() {
        for t in 0..1000 {
            let value = noise(t, 3);
            assert!((-0.5..0.5).contains(&value));
            assert_eq!(value, noise(t, 3));
        }
        assert_ne!(noise(10, 1), noise(10, 2));
    }
}
