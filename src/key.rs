/*
    Private and public key newtypes over the secp256k1 curve provider.

    All scalar and point arithmetic is delegated to the audited,
    constant-time secp256k1 library; this module only owns byte-level
    conversion and secret hygiene.
*/

use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};

#[derive(Clone)]
pub struct PrivKey(SecretKey);

impl PrivKey {
    /**
        Builds a private key from 32 raw bytes. Rejects zero and
        anything not reduced modulo the curve order.
    */
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| WalletError::InvalidParameter("not a valid secp256k1 scalar".to_string()))
    }

    /**
        Adds a 32-byte tweak to this scalar modulo the curve order, as
        BIP-32 child derivation requires.

        Returns `None` when the tweak is not reduced modulo n or the sum
        collapses to zero. Callers treat that as a retry signal, never as
        a silent wraparound.
    */
    pub fn tweak_add(&self, tweak: &[u8; 32]) -> Option<PrivKey> {
        let scalar = Scalar::from_be_bytes(*tweak).ok()?;
        self.0.add_tweak(&scalar).ok().map(Self)
    }

    pub fn as_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.0.secret_bytes())
    }

    pub(crate) fn inner(&self) -> &SecretKey {
        &self.0
    }
}

impl Drop for PrivKey {
    fn drop(&mut self) {
        self.0.non_secure_erase();
    }
}

//Never print key material, not even in debug builds.
impl fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("PrivKey").field(&"[redacted]").finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubKey(PublicKey);

impl PubKey {
    /**
        The result of multiplying the curve generator by the private
        scalar, kept in compressed form.
    */
    pub fn from_priv_key(k: &PrivKey) -> Self {
        Self(PublicKey::from_secret_key(&Secp256k1::new(), k.inner()))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| WalletError::InvalidParameter("not a valid secp256k1 point".to_string()))
    }

    /**
        Compressed SEC1 encoding: parity byte plus x coordinate.
    */
    pub fn as_bytes(&self) -> [u8; 33] {
        self.0.serialize()
    }

    /**
        Uncompressed SEC1 encoding: 0x04 prefix, then x and y.
    */
    pub fn decompressed_bytes(&self) -> [u8; 65] {
        self.0.serialize_uncompressed()
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}
