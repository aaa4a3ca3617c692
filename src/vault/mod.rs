/*
    The vault codec: password-based authenticated encryption of the
    wallet's root secrets (mnemonic, passphrase, metadata).

    There is no fallback cipher. If AEAD setup fails the export fails;
    nothing ever degrades to an unauthenticated or homemade scheme.
*/

mod format;
mod kdf;

pub use format::{CipherId, VaultFile, VAULT_VERSION};
pub use kdf::{
    derive_vault_key, KdfId, KdfParams, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
    DEFAULT_ARGON2_TIME_COST, DEFAULT_PBKDF2_ITERATIONS, SALT_LEN, VAULT_KEY_LEN,
};

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroizing;

use crate::entropy;
use crate::error::{Result, WalletError};
use crate::hdwallet::Wallet;
use format::VaultPayload;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// KDF selection and cost parameters for an export. Imports never read
/// this — they replay whatever the vault file recorded.
#[derive(Debug, Clone)]
pub struct VaultOptions {
    pub kdf: KdfId,
    pub memory_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub iterations: u32,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            kdf: KdfId::Argon2id,
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            time_cost: DEFAULT_ARGON2_TIME_COST,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl VaultOptions {
    /**
        The PBKDF2 fallback profile, for targets without Argon2. The
        resulting vault is tagged accordingly.
    */
    pub fn pbkdf2_fallback() -> Self {
        Self {
            kdf: KdfId::Pbkdf2,
            ..Self::default()
        }
    }

    fn fresh_params(&self) -> KdfParams {
        match self.kdf {
            KdfId::Argon2id => {
                KdfParams::fresh_argon2id(self.memory_kib, self.time_cost, self.parallelism)
            }
            KdfId::Pbkdf2 => KdfParams::fresh_pbkdf2(self.iterations),
        }
    }
}

/**
    AES-256-GCM seal with a fresh random 12-byte nonce. The associated
    data is bound into the tag; this crate passes it empty today.
*/
pub fn encrypt(plaintext: &[u8], key: &[u8; VAULT_KEY_LEN], aad: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|_| WalletError::ConfigurationError("bad AEAD key length".to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&entropy::random_bytes(NONCE_LEN));

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), Payload { msg: plaintext, aad })
        .map_err(|_| WalletError::ConfigurationError("AEAD seal failed".to_string()))?;

    Ok((nonce, ciphertext))
}

/**
    AES-256-GCM open. Fails closed: a wrong key, flipped bit or
    truncated input all collapse into `AuthenticationFailure` with no
    partial plaintext.
*/
pub fn decrypt(
    nonce: &[u8],
    ciphertext: &[u8],
    key: &[u8; VAULT_KEY_LEN],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LEN {
        return Err(WalletError::AuthenticationFailure);
    }
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|_| WalletError::ConfigurationError("bad AEAD key length".to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map(Zeroizing::new)
        .map_err(|_| WalletError::AuthenticationFailure)
}

/**
    Seals a wallet's root secrets under a password with the default
    Argon2id profile.
*/
pub fn export_wallet(wallet: &Wallet, password: &str) -> Result<VaultFile> {
    export_wallet_with_options(wallet, password, &VaultOptions::default())
}

pub fn export_wallet_with_options(
    wallet: &Wallet,
    password: &str,
    options: &VaultOptions,
) -> Result<VaultFile> {
    let params = options.fresh_params();
    let key = derive_vault_key(options.kdf, &params, password)?;

    let payload = VaultPayload {
        mnemonic: wallet.mnemonic().phrase().to_string(),
        passphrase: wallet.passphrase().map(str::to_string),
        metadata: wallet.metadata().clone(),
    };
    let plaintext = Zeroizing::new(
        serde_json::to_vec(&payload)
            .map_err(|e| WalletError::ConfigurationError(format!("payload serialization: {}", e)))?,
    );

    let (nonce, ciphertext) = encrypt(&plaintext, &key, b"")?;
    tracing::debug!(kdf = ?options.kdf, "wallet vault sealed");

    Ok(VaultFile {
        version: VAULT_VERSION,
        kdf: options.kdf,
        kdf_params: params,
        cipher: CipherId::Aes256Gcm,
        nonce: BASE64.encode(nonce),
        ciphertext: BASE64.encode(&ciphertext),
    })
}

/**
    Opens a vault and reconstructs the wallet by re-running the
    mnemonic-to-seed and seed-to-master pipeline. The KDF identity and
    parameters come from the file, never from the caller.
*/
pub fn import_wallet(vault: &VaultFile, password: &str) -> Result<Wallet> {
    //CipherId parsing already guarantees AES-256-GCM here
    let key = derive_vault_key(vault.kdf, &vault.kdf_params, password)?;

    //Undecodable fields fail closed, same as a bad tag
    let nonce = BASE64
        .decode(&vault.nonce)
        .map_err(|_| WalletError::AuthenticationFailure)?;
    let ciphertext = BASE64
        .decode(&vault.ciphertext)
        .map_err(|_| WalletError::AuthenticationFailure)?;

    let plaintext = decrypt(&nonce, &ciphertext, &key, b"")?;

    let payload: VaultPayload = serde_json::from_slice(&plaintext)
        .map_err(|_| WalletError::ConfigurationError("vault payload is malformed".to_string()))?;

    let mut wallet = Wallet::from_phrase(&payload.mnemonic, payload.passphrase.as_deref())?;
    wallet.set_metadata(payload.metadata.clone());
    tracing::debug!(kdf = ?vault.kdf, "wallet vault opened");
    Ok(wallet)
}

/**
    Byte-level convenience wrappers over the container format.
*/
pub fn export_vault(wallet: &Wallet, password: &str) -> Result<Vec<u8>> {
    export_wallet(wallet, password)?.to_bytes()
}

pub fn import_vault(bytes: &[u8], password: &str) -> Result<Wallet> {
    import_wallet(&VaultFile::from_bytes(bytes)?, password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hdwallet::WalletMetadata;

    const TEST_PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    //Cheap parameters so the suite stays fast; the KDF identity and
    //dispatch logic are exactly the production path.
    fn light_options() -> VaultOptions {
        VaultOptions {
            kdf: KdfId::Argon2id,
            memory_kib: 8 * 1024,
            time_cost: 1,
            parallelism: 1,
            iterations: 10_000,
        }
    }

    fn test_wallet() -> Wallet {
        let mut wallet = Wallet::from_phrase(TEST_PHRASE, Some("hunter2")).unwrap();
        wallet.set_metadata(WalletMetadata {
            label: Some("savings".to_string()),
        });
        wallet
    }

    #[test]
    fn aead_round_trip_and_aad_binding() {
        let key = [7u8; VAULT_KEY_LEN];
        let (nonce, ct) = encrypt(b"secret bytes", &key, b"context").unwrap();

        let pt = decrypt(&nonce, &ct, &key, b"context").unwrap();
        assert_eq!(&*pt, b"secret bytes");

        assert!(matches!(
            decrypt(&nonce, &ct, &key, b"other context"),
            Err(WalletError::AuthenticationFailure)
        ));
    }

    #[test]
    fn nonces_are_fresh_per_seal() {
        let key = [7u8; VAULT_KEY_LEN];
        let (n1, _) = encrypt(b"x", &key, b"").unwrap();
        let (n2, _) = encrypt(b"x", &key, b"").unwrap();
        assert_ne!(n1, n2);
    }

    #[test]
    fn vault_round_trip_restores_the_wallet() {
        let wallet = test_wallet();
        let vault = export_wallet_with_options(&wallet, "pw", &light_options()).unwrap();
        assert_eq!(vault.kdf, KdfId::Argon2id);

        let mut restored = import_wallet(&vault, "pw").unwrap();
        assert_eq!(restored.mnemonic().phrase(), TEST_PHRASE);
        assert_eq!(restored.passphrase(), Some("hunter2"));
        assert_eq!(restored.metadata().label.as_deref(), Some("savings"));
        assert_eq!(restored.master_fingerprint(), wallet.master_fingerprint());

        //And it still derives
        let derived = restored
            .derive_address(crate::address::Chain::Ethereum, 0, 0)
            .unwrap();
        assert!(derived.address.starts_with("0x"));
    }

    #[test]
    fn wrong_password_is_an_authentication_failure() {
        let vault = export_wallet_with_options(&test_wallet(), "pw", &light_options()).unwrap();
        assert!(matches!(
            import_wallet(&vault, "wrong-pw"),
            Err(WalletError::AuthenticationFailure)
        ));
    }

    #[test]
    fn single_byte_tampering_is_detected() {
        let vault = export_wallet_with_options(&test_wallet(), "pw", &light_options()).unwrap();

        //Flip one ciphertext byte
        let mut ct = BASE64.decode(&vault.ciphertext).unwrap();
        let mid = ct.len() / 2;
        ct[mid] ^= 0x01;
        let mut tampered = vault.clone();
        tampered.ciphertext = BASE64.encode(&ct);
        assert!(matches!(
            import_wallet(&tampered, "pw"),
            Err(WalletError::AuthenticationFailure)
        ));

        //Flip one nonce byte
        let mut nonce = BASE64.decode(&vault.nonce).unwrap();
        nonce[0] ^= 0x01;
        let mut tampered = vault.clone();
        tampered.nonce = BASE64.encode(&nonce);
        assert!(matches!(
            import_wallet(&tampered, "pw"),
            Err(WalletError::AuthenticationFailure)
        ));
    }

    #[test]
    fn import_replays_the_kdf_parameters_from_the_file() {
        let mut vault = export_wallet_with_options(&test_wallet(), "pw", &light_options()).unwrap();
        //Altered cost parameters derive a different key, so the tag
        //check must reject the correct password too
        vault.kdf_params.time_cost = Some(2);
        assert!(matches!(
            import_wallet(&vault, "pw"),
            Err(WalletError::AuthenticationFailure)
        ));
    }

    #[test]
    fn pbkdf2_fallback_is_tagged_and_round_trips() {
        let mut options = light_options();
        options.kdf = KdfId::Pbkdf2;

        let vault = export_wallet_with_options(&test_wallet(), "pw", &options).unwrap();
        assert_eq!(vault.kdf, KdfId::Pbkdf2);
        assert!(vault.kdf_params.iterations.is_some());
        assert!(vault.kdf_params.memory_kib.is_none());

        let restored = import_wallet(&vault, "pw").unwrap();
        assert_eq!(restored.mnemonic().phrase(), TEST_PHRASE);
    }

    #[test]
    fn byte_level_wrappers_round_trip() {
        let wallet = test_wallet();
        //Default profile is deliberately slow; go through the options
        //path and serialize manually
        let vault = export_wallet_with_options(&wallet, "pw", &light_options()).unwrap();
        let bytes = vault.to_bytes().unwrap();
        let restored = import_vault(&bytes, "pw").unwrap();
        assert_eq!(restored.mnemonic().phrase(), TEST_PHRASE);
    }
}
