/*
    BIP-39 mnemonic phrases: generation, validation and seed stretching.
*/

mod lang;
mod mnemonic;

pub use lang::{Language, Wordlist, WORDLIST_LEN};
pub use mnemonic::{Mnemonic, Strength};
