/*
    Password-based key derivation for the vault.

    Argon2id is the primary KDF. PBKDF2-HMAC-SHA256 exists as a
    fallback only and is always tagged as such in the container, so an
    import replays exactly the KDF the export ran — never a caller
    default.
*/

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::entropy;
use crate::error::{Result, WalletError};

/// Vault keys are always 256-bit AES keys.
pub const VAULT_KEY_LEN: usize = 32;
/// Fresh random salt length for either KDF.
pub const SALT_LEN: usize = 16;

pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 64 * 1024;
pub const DEFAULT_ARGON2_TIME_COST: u32 = 3;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 4;
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 600_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfId {
    #[serde(rename = "argon2id")]
    Argon2id,
    #[serde(rename = "pbkdf2")]
    Pbkdf2,
}

/// Salt plus the cost parameters appropriate to the chosen KDF. Only
/// the fields the KDF needs are serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub salt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_kib: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
}

impl KdfParams {
    pub fn fresh_argon2id(memory_kib: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            salt: BASE64.encode(&*entropy::random_bytes(SALT_LEN)),
            memory_kib: Some(memory_kib),
            time_cost: Some(time_cost),
            parallelism: Some(parallelism),
            iterations: None,
        }
    }

    pub fn fresh_pbkdf2(iterations: u32) -> Self {
        Self {
            salt: BASE64.encode(&*entropy::random_bytes(SALT_LEN)),
            memory_kib: None,
            time_cost: None,
            parallelism: None,
            iterations: Some(iterations),
        }
    }

    fn salt_bytes(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.salt)
            .map_err(|_| WalletError::ConfigurationError("vault salt is not valid base64".to_string()))
    }

    fn require(&self, field: Option<u32>, name: &str) -> Result<u32> {
        field.ok_or_else(|| {
            WalletError::ConfigurationError(format!("vault kdf_params missing {}", name))
        })
    }
}

/**
    Derives the 32-byte vault key from a password, dispatching purely
    off the KDF identity and parameters the container stores.
*/
pub fn derive_vault_key(
    kdf: KdfId,
    params: &KdfParams,
    password: &str,
) -> Result<Zeroizing<[u8; VAULT_KEY_LEN]>> {
    let salt = params.salt_bytes()?;
    let mut key = Zeroizing::new([0u8; VAULT_KEY_LEN]);

    match kdf {
        KdfId::Argon2id => {
            let memory = params.require(params.memory_kib, "memory_kib")?;
            let time = params.require(params.time_cost, "time_cost")?;
            let lanes = params.require(params.parallelism, "parallelism")?;

            let argon_params = Params::new(memory, time, lanes, Some(VAULT_KEY_LEN))
                .map_err(|e| WalletError::ConfigurationError(format!("argon2 parameters: {}", e)))?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
                .hash_password_into(password.as_bytes(), &salt, key.as_mut())
                .map_err(|e| WalletError::ConfigurationError(format!("argon2 failure: {}", e)))?;
        }
        KdfId::Pbkdf2 => {
            let rounds = params.require(params.iterations, "iterations")?;
            crate::hash::pbkdf2_hmac_sha256(password.as_bytes(), &salt, rounds, key.as_mut());
        }
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_argon2() -> KdfParams {
        KdfParams::fresh_argon2id(8 * 1024, 1, 1)
    }

    #[test]
    fn same_password_same_salt_same_key() {
        let params = light_argon2();
        let a = derive_vault_key(KdfId::Argon2id, &params, "pw").unwrap();
        let b = derive_vault_key(KdfId::Argon2id, &params, "pw").unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn password_and_salt_both_matter() {
        let params = light_argon2();
        let a = derive_vault_key(KdfId::Argon2id, &params, "pw").unwrap();
        let b = derive_vault_key(KdfId::Argon2id, &params, "pw2").unwrap();
        assert_ne!(*a, *b);

        let other_salt = light_argon2();
        let c = derive_vault_key(KdfId::Argon2id, &other_salt, "pw").unwrap();
        assert_ne!(*a, *c);
    }

    #[test]
    fn pbkdf2_fallback_derives_distinct_keys() {
        let params = KdfParams::fresh_pbkdf2(10_000);
        let a = derive_vault_key(KdfId::Pbkdf2, &params, "pw").unwrap();
        let b = derive_vault_key(KdfId::Pbkdf2, &params, "other").unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn missing_cost_parameters_are_configuration_errors() {
        let mut params = light_argon2();
        params.time_cost = None;
        assert!(matches!(
            derive_vault_key(KdfId::Argon2id, &params, "pw"),
            Err(WalletError::ConfigurationError(_))
        ));

        let mut params = KdfParams::fresh_pbkdf2(1000);
        params.iterations = None;
        assert!(matches!(
            derive_vault_key(KdfId::Pbkdf2, &params, "pw"),
            Err(WalletError::ConfigurationError(_))
        ));
    }

    #[test]
    fn garbage_salt_is_a_configuration_error() {
        let mut params = light_argon2();
        params.salt = "///not base64///".to_string();
        assert!(matches!(
            derive_vault_key(KdfId::Argon2id, &params, "pw"),
            Err(WalletError::ConfigurationError(_))
        ));
    }
}
