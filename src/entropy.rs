/*
    Entropy sourcing. Everything secret in this crate starts from the
    operating system CSPRNG; no general-purpose PRNG is ever used.
*/

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/**
    Fills a fresh buffer of `size` bytes from the OS random source.
    The buffer zeroes itself when dropped.
*/
pub fn random_bytes(size: usize) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0u8; size]);
    OsRng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_length_is_honoured() {
        for size in [16, 20, 24, 28, 32] {
            assert_eq!(random_bytes(size).len(), size);
        }
    }

    #[test]
    fn consecutive_draws_differ() {
        //Collision chance over 32 bytes is negligible
        assert_ne!(*random_bytes(32), *random_bytes(32));
    }
}
