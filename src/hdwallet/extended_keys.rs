/*
    Extended keys for BIP-32 hierarchical deterministic derivation.

    An extended key pairs the 32-byte key (or 33-byte compressed point)
    with a 32-byte chain code plus the positional metadata needed to
    keep deriving: depth, child index and parent fingerprint.
*/

use crate::error::{Result, WalletError};
use crate::hash;
use crate::hdwallet::ckd::{derive_xprv, ChildOptions};
use crate::hdwallet::path::Path;
use crate::key::{PrivKey, PubKey};

#[derive(Debug, Clone)]
pub struct Xprv {
    key: PrivKey,
    chaincode: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    index: u32,
}

impl Xprv {
    pub(crate) fn construct(
        key: PrivKey,
        chaincode: [u8; 32],
        depth: u8,
        parent_fingerprint: [u8; 4],
        index: u32,
    ) -> Self {
        Self {
            key,
            chaincode,
            depth,
            parent_fingerprint,
            index,
        }
    }

    /**
        Builds the depth-0 master key from a seed:
        I = HMAC-SHA512(key = "Bitcoin seed", data = seed); the left half
        is the master scalar, the right half the master chain code.
    */
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(WalletError::InvalidParameter(format!(
                "seed must be 16..=64 bytes, got {}",
                seed.len()
            )));
        }

        let i = hash::hmac_sha512(seed, b"Bitcoin seed");
        //A zero or unreduced left half invalidates the whole seed
        let key = PrivKey::from_slice(&i[0..32]).map_err(|_| {
            WalletError::InvalidParameter("seed produced an invalid master scalar".to_string())
        })?;

        Ok(Self {
            key,
            chaincode: i[32..64].try_into().expect("right half is 32 bytes"),
            depth: 0,
            parent_fingerprint: [0u8; 4],
            index: 0,
        })
    }

    /**
        Derives one child, hardened or normal.
    */
    pub fn derive_child(&self, options: ChildOptions) -> Result<Xprv> {
        derive_xprv(self, options)
    }

    /**
        Folds `derive_child` over every path component in order.
    */
    pub fn derive_from_path(&self, path: &Path) -> Result<Xprv> {
        if self.depth as usize + path.depth() > u8::MAX as usize {
            return Err(WalletError::InvalidPath(format!(
                "path would exceed depth 255: {}",
                path
            )));
        }

        let mut current = self.clone();
        for component in &path.components {
            current = current.derive_child(*component)?;
        }
        Ok(current)
    }

    /**
        The compressed public key for this node, computed by the curve
        provider (generator multiplication plus point compression).
    */
    pub fn get_pub(&self) -> PubKey {
        PubKey::from_priv_key(&self.key)
    }

    pub fn get_xpub(&self) -> Xpub {
        Xpub {
            key: self.get_pub(),
            chaincode: self.chaincode,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            index: self.index,
        }
    }

    /**
        First four bytes of HASH160 of the compressed public key, as the
        public BIP-32 specification defines fingerprints.
    */
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.get_pub())
    }

    pub fn private_key(&self) -> &PrivKey {
        &self.key
    }

    pub fn chaincode(&self) -> [u8; 32] {
        self.chaincode
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xpub {
    key: PubKey,
    chaincode: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    index: u32,
}

impl Xpub {
    pub fn public_key(&self) -> PubKey {
        self.key
    }

    pub fn chaincode(&self) -> [u8; 32] {
        self.chaincode
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.key)
    }
}

fn fingerprint_of(key: &PubKey) -> [u8; 4] {
    hash::hash160(key.as_bytes())[0..4]
        .try_into()
        .expect("four bytes")
}
