/*
    The versioned on-disk vault container. This is the only artifact the
    crate ever persists.

    Readers dispatch KDF and cipher behavior purely off the identifiers
    stored here; caller-supplied defaults never influence an import.
*/

use std::fs;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, WalletError};
use crate::hdwallet::WalletMetadata;
use crate::vault::kdf::{KdfId, KdfParams};

/// Current container format version.
pub const VAULT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherId {
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultFile {
    pub version: u32,
    pub kdf: KdfId,
    pub kdf_params: KdfParams,
    pub cipher: CipherId,
    /// Base64, 12 raw bytes.
    pub nonce: String,
    /// Base64, authentication tag appended.
    pub ciphertext: String,
}

impl VaultFile {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| WalletError::ConfigurationError(format!("vault serialization: {}", e)))
    }

    /**
        Parses a container. Unknown KDF or cipher identifiers and any
        structural damage surface as `ConfigurationError`; version
        checking happens here so later formats fail early.
    */
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file: VaultFile = serde_json::from_slice(bytes)
            .map_err(|e| WalletError::ConfigurationError(format!("malformed vault file: {}", e)))?;

        if file.version != VAULT_VERSION {
            return Err(WalletError::ConfigurationError(format!(
                "unsupported vault version {}",
                file.version
            )));
        }
        Ok(file)
    }

    pub fn write_to_file<P: AsRef<FsPath>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn read_from_file<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}

/// The secret plaintext a vault wraps. Wiped on drop; only ever alive
/// between (de)serialization and the AEAD call.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub(crate) struct VaultPayload {
    pub mnemonic: String,
    pub passphrase: Option<String>,
    #[zeroize(skip)]
    pub metadata: WalletMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VaultFile {
        VaultFile {
            version: VAULT_VERSION,
            kdf: KdfId::Pbkdf2,
            kdf_params: KdfParams::fresh_pbkdf2(1000),
            cipher: CipherId::Aes256Gcm,
            nonce: "AAAAAAAAAAAAAAAA".to_string(),
            ciphertext: "AAAA".to_string(),
        }
    }

    #[test]
    fn container_round_trips_through_json() {
        let file = sample();
        let parsed = VaultFile::from_bytes(&file.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn identifiers_serialize_as_documented_strings() {
        let text = String::from_utf8(sample().to_bytes().unwrap()).unwrap();
        assert!(text.contains("\"pbkdf2\""));
        assert!(text.contains("\"aes-256-gcm\""));
    }

    #[test]
    fn unknown_kdf_identifier_is_rejected() {
        let text = String::from_utf8(sample().to_bytes().unwrap()).unwrap();
        let tampered = text.replace("pbkdf2", "scrypt");
        assert!(matches!(
            VaultFile::from_bytes(tampered.as_bytes()),
            Err(WalletError::ConfigurationError(_))
        ));
    }

    #[test]
    fn unknown_cipher_identifier_is_rejected() {
        let text = String::from_utf8(sample().to_bytes().unwrap()).unwrap();
        let tampered = text.replace("aes-256-gcm", "xor");
        assert!(matches!(
            VaultFile::from_bytes(tampered.as_bytes()),
            Err(WalletError::ConfigurationError(_))
        ));
    }

    #[test]
    fn future_versions_fail_early() {
        let mut file = sample();
        file.version = 99;
        let bytes = serde_json::to_vec(&file).unwrap();
        assert!(matches!(
            VaultFile::from_bytes(&bytes),
            Err(WalletError::ConfigurationError(_))
        ));
    }

    #[test]
    fn files_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.vault");
        let file = sample();
        file.write_to_file(&path).unwrap();
        assert_eq!(VaultFile::read_from_file(&path).unwrap(), file);
    }
}
