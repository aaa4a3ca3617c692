/*
    Library for hierarchical deterministic key derivation and encrypted
    at-rest storage of wallet secrets.

    One mnemonic (BIP-39) stretches into a seed, the seed roots a BIP-32
    key tree, BIP-44 paths address per-chain accounts, and the whole
    root secret can be sealed into a password-protected vault file.

    References:
        - BIP-39 / BIP-32 / BIP-44
            the derivation behavior and test vectors come straight from
            the reference documents

        - learn me a bitcoin (https://learnmeabitcoin.com/)
            for worked address-encoding examples
*/

//Outward facing modules
pub mod address;
pub mod bip39;
pub mod error;
pub mod hdwallet;
pub mod key;
pub mod vault;

//Modules for internal use
mod entropy;
mod hash;

//Convenience re-exports of the types most callers touch
pub use address::{Address, Chain};
pub use bip39::{Language, Mnemonic, Strength};
pub use error::{Result, WalletError};
pub use hdwallet::{ChildOptions, DerivedAddress, Path, Wallet, WalletMetadata, Xprv, Xpub};
pub use vault::{VaultFile, VaultOptions};
