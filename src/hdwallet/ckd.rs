/*
    BIP-32 child key derivation from parent extended private keys.

    Hardened children commit to the parent private key, normal children
    to the parent public key; both run through HMAC-SHA512 keyed by the
    parent chain code. Public-parent derivation is deliberately not
    implemented — every path in this crate is privately derived.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
*/

use zeroize::Zeroizing;

use crate::error::{Result, WalletError};
use crate::hash;
use crate::hdwallet::extended_keys::Xprv;
use crate::hdwallet::path::HARDENED_OFFSET;
use crate::key::PrivKey;

/// Attempts beyond the requested index before derivation gives up.
/// A single retry fires with probability < 2^-127.
pub const MAX_DERIVE_RETRIES: u32 = 4;

/// Child derivation options as used throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOptions {
    Normal(u32),
    Hardened(u32),
}

impl ChildOptions {
    /**
        The wire index: hardened children carry bit 31.
        Fails when the requested index would collide with the hardened
        range.
    */
    pub fn raw_index(&self) -> Result<u32> {
        match *self {
            ChildOptions::Normal(i) => {
                if i >= HARDENED_OFFSET {
                    return Err(WalletError::InvalidParameter(format!(
                        "normal index {} is reserved for hardened children",
                        i
                    )));
                }
                Ok(i)
            }
            ChildOptions::Hardened(i) => {
                if i >= HARDENED_OFFSET {
                    return Err(WalletError::InvalidParameter(format!(
                        "hardened index {} exceeds 2^31-1",
                        i
                    )));
                }
                Ok(i | HARDENED_OFFSET)
            }
        }
    }

    fn is_hardened(&self) -> bool {
        matches!(self, ChildOptions::Hardened(_))
    }
}

/**
    Derives the child extended private key of `parent` at `options`.

    When HMAC output yields a scalar at or above the curve order, or the
    tweak-add collapses to zero, the derivation for that index is invalid
    per BIP-32: the engine retries at the next index, visibly, up to
    `MAX_DERIVE_RETRIES` times before reporting `DerivationExhausted`.
*/
pub fn derive_xprv(parent: &Xprv, options: ChildOptions) -> Result<Xprv> {
    if parent.depth() == u8::MAX {
        return Err(WalletError::InvalidPath(
            "cannot derive past depth 255".to_string(),
        ));
    }

    let start = options.raw_index()?;
    let hardened = options.is_hardened();

    for attempt in 0..=MAX_DERIVE_RETRIES {
        let index = start
            .checked_add(attempt)
            .ok_or_else(|| WalletError::InvalidParameter("child index overflow".to_string()))?;

        match try_derive(parent, index, hardened) {
            Some((key, chaincode)) => {
                if attempt > 0 {
                    tracing::warn!(index, attempt, "child derivation retried past invalid scalar");
                }
                return Ok(Xprv::construct(
                    key,
                    chaincode,
                    parent.depth() + 1,
                    parent.fingerprint(),
                    index,
                ));
            }
            None => {
                tracing::debug!(index, "derived scalar out of range, retrying at next index");
            }
        }
    }

    Err(WalletError::DerivationExhausted(start))
}

/**
    One derivation attempt at a concrete wire index. `None` means the
    candidate scalar was unusable and the caller should move on.
*/
fn try_derive(parent: &Xprv, index: u32, hardened: bool) -> Option<(PrivKey, [u8; 32])> {
    //Hardened: 0x00 || k_par || index.  Normal: ser_P(parent) || index.
    let mut data = Zeroizing::new(Vec::with_capacity(37));
    if hardened {
        data.push(0x00);
        data.extend_from_slice(&*parent.private_key().as_bytes());
    } else {
        data.extend_from_slice(&parent.get_pub().as_bytes());
    }
    data.extend_from_slice(&index.to_be_bytes());

    let i = Zeroizing::new(hash::hmac_sha512(&data, &parent.chaincode()));

    let il: [u8; 32] = i[0..32].try_into().expect("left half is 32 bytes");
    let child_key = parent.private_key().tweak_add(&il)?;

    let chaincode: [u8; 32] = i[32..64].try_into().expect("right half is 32 bytes");
    Some((child_key, chaincode))
}
