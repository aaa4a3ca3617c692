/*
    Hierarchical deterministic key derivation under BIP-32/BIP-44, plus
    the wallet aggregate tying mnemonic, master key and address cache
    together.
*/

mod ckd;
mod extended_keys;
mod path;
mod wallet;

pub use ckd::{derive_xprv, ChildOptions, MAX_DERIVE_RETRIES};
pub use extended_keys::{Xprv, Xpub};
pub use path::{Path, HARDENED_OFFSET};
pub use wallet::{DerivedAddress, Wallet, WalletMetadata};
