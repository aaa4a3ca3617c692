/*
    Hash module wrapping the digest primitives the rest of the crate
    builds on: SHA-256 (mnemonic checksums, Base58Check), HASH160
    (fingerprints, legacy addresses), HMAC-SHA512 (BIP-32 chains),
    Keccak-256 (EVM addresses) and the PBKDF2 stretches.
*/

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

pub fn sha256<T>(input: T) -> [u8; 32]
where
    T: AsRef<[u8]>,
{
    Sha256::digest(input).into()
}

/**
    Double SHA-256, used for Base58Check checksums.
*/
pub fn sha256d<T>(input: T) -> [u8; 32]
where
    T: AsRef<[u8]>,
{
    sha256(sha256(input))
}

pub fn ripemd160<T>(input: T) -> [u8; 20]
where
    T: AsRef<[u8]>,
{
    Ripemd160::digest(input).into()
}

/**
    RIPEMD-160 of SHA-256. The public BIP-32 fingerprint and legacy
    address hash.
*/
pub fn hash160<T>(input: T) -> [u8; 20]
where
    T: AsRef<[u8]>,
{
    ripemd160(sha256(input))
}

pub fn keccak256<T>(input: T) -> [u8; 32]
where
    T: AsRef<[u8]>,
{
    Keccak256::digest(input).into()
}

pub fn hmac_sha512(data: &[u8], key: &[u8]) -> [u8; 64] {
    let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, out);
}

pub fn pbkdf2_hmac_sha256(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, rounds, out);
}
