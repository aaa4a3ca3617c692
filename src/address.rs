/*
    Chain-specific address encodings: pure transforms from a derived
    public key to the human-displayable account identifier.

    EVM checksum casing (EIP-55) is a display concern layered on top by
    callers; this module emits plain lowercase hex.
*/

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WalletError};
use crate::hash;
use crate::key::PubKey;

/// Version byte prepended to legacy Bitcoin mainnet addresses.
const BTC_MAINNET_P2PKH: u8 = 0x00;

/// Chains the encoder knows how to render addresses for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Solana,
    BitcoinLegacy,
}

impl Chain {
    /// SLIP-44 coin type used as the second BIP-44 path component.
    pub fn coin_type(&self) -> u32 {
        match self {
            Chain::Ethereum => 60,
            Chain::Solana => 501,
            Chain::BitcoinLegacy => 0,
        }
    }
}

impl FromStr for Chain {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "eth" | "evm" => Ok(Chain::Ethereum),
            "solana" | "sol" => Ok(Chain::Solana),
            "bitcoin" | "btc" => Ok(Chain::BitcoinLegacy),
            other => Err(WalletError::UnsupportedChain(other.to_string())),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Chain::Ethereum => write!(f, "ethereum"),
            Chain::Solana => write!(f, "solana"),
            Chain::BitcoinLegacy => write!(f, "bitcoin"),
        }
    }
}

pub struct Address;

impl Address {
    pub fn encode(chain: Chain, pubkey: &PubKey) -> String {
        match chain {
            Chain::Ethereum => Self::evm(pubkey),
            Chain::Solana => Self::solana(pubkey),
            Chain::BitcoinLegacy => Self::bitcoin_legacy(pubkey),
        }
    }

    /**
        Keccak-256 over the uncompressed X||Y coordinates (0x04 prefix
        dropped), last 20 bytes, 0x-prefixed hex.
    */
    pub fn evm(pubkey: &PubKey) -> String {
        let uncompressed = pubkey.decompressed_bytes();
        let digest = hash::keccak256(&uncompressed[1..]);
        format!("0x{}", hex::encode(&digest[12..]))
    }

    /**
        Direct Base58 rendering of the compressed public key bytes.
    */
    pub fn solana(pubkey: &PubKey) -> String {
        bs58::encode(pubkey.as_bytes()).into_string()
    }

    /**
        Base58Check P2PKH: version 0x00, HASH160 of the compressed key,
        four checksum bytes of double SHA-256.
    */
    pub fn bitcoin_legacy(pubkey: &PubKey) -> String {
        let mut payload = Vec::with_capacity(25);
        payload.push(BTC_MAINNET_P2PKH);
        payload.extend_from_slice(&hash::hash160(pubkey.as_bytes()));

        let checksum = hash::sha256d(&payload);
        payload.extend_from_slice(&checksum[0..4]);

        bs58::encode(payload).into_string()
    }

    /**
        Checks a legacy address decodes to 25 bytes with a valid
        Base58Check checksum.
    */
    pub fn is_valid_legacy(address: &str) -> bool {
        let decoded = match bs58::decode(address).into_vec() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        if decoded.len() != 25 {
            return false;
        }

        let checksum = hash::sha256d(&decoded[0..21]);
        decoded[21..25] == checksum[0..4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PrivKey;

    //learnmeabitcoin.com worked example
    const BTC_PUBKEY: &str = "0204664c60ceabd82967055ccbd0f56a1585dfbd42032656efa501c463b16fbdfe";
    const BTC_ADDRESS: &str = "124ERAK4SqHMNWXycHPautn5zDYRKr3b2E";

    //Well-known local-devnet account #0
    const EVM_PRIVKEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const EVM_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn bitcoin_legacy_vector() {
        let pubkey = PubKey::from_slice(&hex::decode(BTC_PUBKEY).unwrap()).unwrap();
        let address = Address::bitcoin_legacy(&pubkey);
        assert_eq!(address, BTC_ADDRESS);
        assert!(Address::is_valid_legacy(&address));
        assert!(address.starts_with('1'));
    }

    #[test]
    fn evm_vector() {
        let key = PrivKey::from_slice(&hex::decode(EVM_PRIVKEY).unwrap()).unwrap();
        let pubkey = PubKey::from_priv_key(&key);
        let address = Address::evm(&pubkey);
        assert_eq!(address, EVM_ADDRESS);
        assert_eq!(address.len(), 42);
    }

    #[test]
    fn solana_is_direct_base58_of_the_key() {
        let key = PrivKey::from_slice(&[9u8; 32]).unwrap();
        let pubkey = PubKey::from_priv_key(&key);
        let address = Address::solana(&pubkey);
        let decoded = bs58::decode(&address).into_vec().unwrap();
        assert_eq!(decoded, pubkey.as_bytes().to_vec());
    }

    #[test]
    fn tampered_legacy_address_fails_validation() {
        let mut tampered = String::from(BTC_ADDRESS);
        tampered.replace_range(4..5, if &tampered[4..5] == "A" { "B" } else { "A" });
        assert!(!Address::is_valid_legacy(&tampered));
        assert!(!Address::is_valid_legacy("not an address"));
    }

    #[test]
    fn chain_identifiers_parse_and_render() {
        assert_eq!("ethereum".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert_eq!("SOL".parse::<Chain>().unwrap(), Chain::Solana);
        assert_eq!("btc".parse::<Chain>().unwrap(), Chain::BitcoinLegacy);
        assert!(matches!(
            "dogecoin".parse::<Chain>(),
            Err(WalletError::UnsupportedChain(_))
        ));
        assert_eq!(Chain::Ethereum.to_string(), "ethereum");
    }
}
