/*
    Crate-wide error type. Every fallible public operation returns
    `Result<T>` with one of these variants; secret material never
    appears in a message.
*/

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Error)]
pub enum WalletError {
    /// A caller-supplied value is out of range or malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A mnemonic phrase failed checksum or dictionary validation.
    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    /// A derivation path string could not be parsed.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Child derivation ran out of retries for invalid scalars,
    /// starting from the given index.
    #[error("key derivation exhausted retries starting at index {0}")]
    DerivationExhausted(u32),

    /// The chain name is not one this crate encodes addresses for.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    /// Wrong password or tampered vault. Deliberately carries no
    /// detail about which.
    #[error("unable to unlock vault")]
    AuthenticationFailure,

    /// A vault file or KDF parameter set is structurally unusable.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
