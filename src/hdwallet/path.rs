/*
    Parsing of string derivation paths ("m/44'/60'/0'/0/0") into the
    child-option sequence the derivation engine folds over.
*/

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WalletError};
use crate::hdwallet::ChildOptions;

/// Top of the non-hardened index range; indexes at or above carry the
/// hardened marker bit.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Parsed once per derivation request, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub components: Vec<ChildOptions>,
}

impl Path {
    /**
        The BIP-44 account layout used by the wallet aggregate:
        m / 44' / coin_type' / account' / change / address_index
    */
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> Self {
        Self {
            components: vec![
                ChildOptions::Hardened(44),
                ChildOptions::Hardened(coin_type),
                ChildOptions::Hardened(account),
                ChildOptions::Normal(change),
                ChildOptions::Normal(index),
            ],
        }
    }

    pub fn depth(&self) -> usize {
        self.components.len()
    }
}

impl FromStr for Path {
    type Err = WalletError;

    fn from_str(path: &str) -> Result<Self> {
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(WalletError::InvalidPath(format!(
                "path must start with 'm': {}",
                path
            )));
        }

        let mut components = vec![];
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (part, false),
            };

            let index: u32 = digits.parse().map_err(|_| {
                WalletError::InvalidPath(format!("bad component '{}' in {}", part, path))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(WalletError::InvalidPath(format!(
                    "index {} exceeds 2^31-1 in {}",
                    index, path
                )));
            }

            components.push(if hardened {
                ChildOptions::Hardened(index)
            } else {
                ChildOptions::Normal(index)
            });
        }

        if components.len() > u8::MAX as usize {
            return Err(WalletError::InvalidPath(format!(
                "path deeper than 255 levels: {}",
                path
            )));
        }

        Ok(Self { components })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            match component {
                ChildOptions::Normal(i) => write!(f, "/{}", i)?,
                ChildOptions::Hardened(i) => write!(f, "/{}'", i)?,
            }
        }
        Ok(())
    }
}
