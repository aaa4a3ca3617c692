/*
    The wallet aggregate: one mnemonic (plus optional passphrase), the
    master extended key derived from it, and a lazy per-path cache of
    derived addresses.

    The cache is never authoritative — every entry can be rebuilt from
    the master key and a path — and is keyed by the path string so it
    can be cloned or inspected without dangling references. Mutation
    goes through `&mut self`, which is the single-writer discipline a
    shared wallet needs.
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::address::{Address, Chain};
use crate::bip39::{Language, Mnemonic, Strength};
use crate::error::Result;
use crate::hdwallet::{Path, Xprv};
use crate::key::PubKey;

/// Non-secret bookkeeping persisted alongside the mnemonic in a vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletMetadata {
    pub label: Option<String>,
}

/// What `derive_address` hands back: never the private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub path: String,
    pub address: String,
    pub public_key: [u8; 33],
}

pub struct Wallet {
    mnemonic: Mnemonic,
    passphrase: Option<Zeroizing<String>>,
    master: Xprv,
    metadata: WalletMetadata,
    cache: HashMap<String, DerivedAddress>,
}

impl Wallet {
    /**
        Creates a wallet from fresh entropy at the given strength and
        returns the mnemonic the owner must write down.
    */
    pub fn create(strength_bits: u32) -> Result<(Self, Mnemonic)> {
        let strength = Strength::from_bits(strength_bits)?;
        let mnemonic = Mnemonic::new(strength, Language::English)?;
        let wallet = Self::from_mnemonic(mnemonic.clone(), None)?;
        Ok((wallet, mnemonic))
    }

    /**
        Rebuilds a wallet from an already-validated mnemonic. The seed
        exists only for the duration of this call; the master key is all
        that is retained.
    */
    pub fn from_mnemonic(mnemonic: Mnemonic, passphrase: Option<&str>) -> Result<Self> {
        let seed = mnemonic.to_seed(passphrase.unwrap_or(""));
        let master = Xprv::from_seed(seed.as_ref())?;

        Ok(Self {
            mnemonic,
            passphrase: passphrase.map(|p| Zeroizing::new(p.to_string())),
            master,
            metadata: WalletMetadata::default(),
            cache: HashMap::new(),
        })
    }

    /**
        Imports a wallet from a phrase, running full checksum validation.
    */
    pub fn from_phrase(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = Mnemonic::from_phrase(phrase, Language::English)?;
        Self::from_mnemonic(mnemonic, passphrase)
    }

    /**
        Derives (or serves from cache) the address at
        m/44'/coin_type'/account'/0/index for the given chain.
    */
    pub fn derive_address(
        &mut self,
        chain: Chain,
        account: u32,
        index: u32,
    ) -> Result<DerivedAddress> {
        let path = Path::bip44(chain.coin_type(), account, 0, index);
        let key = path.to_string();

        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let xprv = self.master.derive_from_path(&path)?;
        let pubkey = xprv.get_pub();
        let derived = DerivedAddress {
            path: key.clone(),
            address: Address::encode(chain, &pubkey),
            public_key: pubkey.as_bytes(),
        };

        self.cache.insert(key, derived.clone());
        Ok(derived)
    }

    /**
        The explicit raw-key export path. Separate from `derive_address`
        on purpose, bypasses the cache, and the returned buffer wipes
        itself on drop.
    */
    pub fn export_raw_key(
        &self,
        chain: Chain,
        account: u32,
        index: u32,
    ) -> Result<Zeroizing<[u8; 32]>> {
        let path = Path::bip44(chain.coin_type(), account, 0, index);
        let xprv = self.master.derive_from_path(&path)?;
        Ok(xprv.private_key().as_bytes())
    }

    /**
        Derives the extended key at an arbitrary path.
    */
    pub fn derive_xprv(&self, path: &Path) -> Result<Xprv> {
        self.master.derive_from_path(path)
    }

    pub fn public_key_at(&self, path: &Path) -> Result<PubKey> {
        Ok(self.master.derive_from_path(path)?.get_pub())
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.as_str())
    }

    pub fn master_fingerprint(&self) -> [u8; 4] {
        self.master.fingerprint()
    }

    pub fn metadata(&self) -> &WalletMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: WalletMetadata) {
        self.metadata = metadata;
    }

    /// Number of derivations currently cached; diagnostics only.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn create_yields_expected_word_count() {
        let (wallet, mnemonic) = Wallet::create(128).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert_eq!(wallet.mnemonic().phrase(), mnemonic.phrase());

        let (_, mnemonic24) = Wallet::create(256).unwrap();
        assert_eq!(mnemonic24.word_count(), 24);
    }

    #[test]
    fn bad_strength_is_rejected() {
        assert!(Wallet::create(127).is_err());
    }

    #[test]
    fn ethereum_addresses_have_the_expected_shape() {
        let mut wallet = Wallet::from_phrase(TEST_PHRASE, None).unwrap();

        let first = wallet.derive_address(Chain::Ethereum, 0, 0).unwrap();
        assert!(first.address.starts_with("0x"));
        assert_eq!(first.address.len(), 42);
        assert_eq!(first.path, "m/44'/60'/0'/0/0");

        let second = wallet.derive_address(Chain::Ethereum, 0, 1).unwrap();
        assert_ne!(first.address, second.address);
    }

    #[test]
    fn cache_serves_repeat_requests() {
        let mut wallet = Wallet::from_phrase(TEST_PHRASE, None).unwrap();
        let a = wallet.derive_address(Chain::Solana, 0, 0).unwrap();
        assert_eq!(wallet.cache_len(), 1);

        let b = wallet.derive_address(Chain::Solana, 0, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(wallet.cache_len(), 1);

        wallet.derive_address(Chain::BitcoinLegacy, 0, 0).unwrap();
        assert_eq!(wallet.cache_len(), 2);
    }

    #[test]
    fn chains_get_distinct_paths_and_addresses() {
        let mut wallet = Wallet::from_phrase(TEST_PHRASE, None).unwrap();
        let eth = wallet.derive_address(Chain::Ethereum, 0, 0).unwrap();
        let btc = wallet.derive_address(Chain::BitcoinLegacy, 0, 0).unwrap();
        assert_ne!(eth.path, btc.path);
        assert_ne!(eth.address, btc.address);
    }

    #[test]
    fn passphrase_changes_every_derived_key() {
        let mut plain = Wallet::from_phrase(TEST_PHRASE, None).unwrap();
        let mut protected = Wallet::from_phrase(TEST_PHRASE, Some("hunter2")).unwrap();
        let a = plain.derive_address(Chain::Ethereum, 0, 0).unwrap();
        let b = protected.derive_address(Chain::Ethereum, 0, 0).unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(plain.master_fingerprint(), protected.master_fingerprint());
    }

    #[test]
    fn raw_key_export_matches_the_published_public_key() {
        let mut wallet = Wallet::from_phrase(TEST_PHRASE, None).unwrap();
        let derived = wallet.derive_address(Chain::Ethereum, 0, 0).unwrap();

        let raw = wallet.export_raw_key(Chain::Ethereum, 0, 0).unwrap();
        let key = crate::key::PrivKey::from_slice(raw.as_ref()).unwrap();
        assert_eq!(PubKey::from_priv_key(&key).as_bytes(), derived.public_key);
    }

    #[test]
    fn derivation_is_reproducible_across_instances() {
        let mut w1 = Wallet::from_phrase(TEST_PHRASE, None).unwrap();
        let mut w2 = Wallet::from_phrase(TEST_PHRASE, None).unwrap();
        assert_eq!(
            w1.derive_address(Chain::Ethereum, 3, 9).unwrap(),
            w2.derive_address(Chain::Ethereum, 3, 9).unwrap()
        );
    }
}
