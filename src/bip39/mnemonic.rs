/*
    BIP-39 mnemonic codec: entropy to checksum-guarded phrase, phrase
    validation and the PBKDF2 stretch down to the 64-byte seed.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki
*/

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::bip39::lang::{Language, Wordlist};
use crate::error::{Result, WalletError};
use crate::{entropy, hash};

/// PBKDF2 rounds for the mnemonic-to-seed stretch, fixed by BIP-39.
const SEED_STRETCH_ROUNDS: u32 = 2048;

/// Entropy strengths a mnemonic may be generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Bits128,
    Bits160,
    Bits192,
    Bits224,
    Bits256,
}

impl Strength {
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            128 => Ok(Strength::Bits128),
            160 => Ok(Strength::Bits160),
            192 => Ok(Strength::Bits192),
            224 => Ok(Strength::Bits224),
            256 => Ok(Strength::Bits256),
            other => Err(WalletError::InvalidParameter(format!(
                "entropy strength must be one of 128/160/192/224/256 bits, got {}",
                other
            ))),
        }
    }

    pub fn entropy_bytes(self) -> usize {
        match self {
            Strength::Bits128 => 16,
            Strength::Bits160 => 20,
            Strength::Bits192 => 24,
            Strength::Bits224 => 28,
            Strength::Bits256 => 32,
        }
    }

    /// (strength + strength/32) / 11
    pub fn word_count(self) -> usize {
        (self.entropy_bytes() * 8 + self.entropy_bytes() / 4) / 11
    }
}

/**
    A validated mnemonic phrase. The human-facing root secret: the
    backing string is wiped on drop and never shown by `Debug`.
*/
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: String,
    #[zeroize(skip)]
    language: Language,
}

impl Mnemonic {
    /**
        Generates a fresh mnemonic at the given strength from the OS
        CSPRNG. The raw entropy lives only inside this call.
    */
    pub fn new(strength: Strength, language: Language) -> Result<Self> {
        let entropy = entropy::random_bytes(strength.entropy_bytes());
        Self::from_entropy(&entropy, language)
    }

    /**
        Encodes raw entropy as a phrase: appends the top ENT/32 bits of
        SHA-256(entropy), then maps each 11-bit group (MSB first) to a
        dictionary word.
    */
    pub fn from_entropy(entropy: &[u8], language: Language) -> Result<Self> {
        let strength = Strength::from_bits((entropy.len() * 8) as u32)?;
        let wordlist = language.wordlist();

        //Combined bitstring: entropy followed by the checksum byte.
        //At most 8 checksum bits are ever used, so one byte suffices.
        let checksum = hash::sha256(entropy)[0];
        let mut data = Zeroizing::new(entropy.to_vec());
        data.push(checksum);

        let words: Vec<&str> = (0..strength.word_count())
            .map(|w| wordlist.word(extract_11_bits(&data, w * 11)))
            .collect();

        Ok(Self {
            phrase: words.join(" "),
            language,
        })
    }

    /**
        Imports a phrase, normalizing whitespace and re-deriving the
        checksum from the word indices. Fails closed: an unknown word or
        a bad word count is `InvalidParameter`, a checksum that does not
        match is `ChecksumMismatch`.
    */
    pub fn from_phrase(phrase: &str, language: Language) -> Result<Self> {
        let wordlist = language.wordlist();
        let words: Vec<&str> = phrase.split_whitespace().collect();

        if !matches!(words.len(), 12 | 15 | 18 | 21 | 24) {
            return Err(WalletError::InvalidParameter(format!(
                "mnemonic must contain 12/15/18/21/24 words, got {}",
                words.len()
            )));
        }

        let mut indices = Vec::with_capacity(words.len());
        for word in &words {
            match wordlist.index_of(word) {
                Some(i) => indices.push(i),
                None => {
                    return Err(WalletError::InvalidParameter(format!(
                        "word not in dictionary: {}",
                        word
                    )))
                }
            }
        }

        //Recompute and compare the embedded checksum
        decode_indices(&indices)?;

        Ok(Self {
            phrase: words.join(" "),
            language,
        })
    }

    /**
        Boolean form of `from_phrase`, for import-time pre-checks.
    */
    pub fn validate(phrase: &str, language: Language) -> bool {
        Self::from_phrase(phrase, language).is_ok()
    }

    /**
        Stretches the phrase (plus optional passphrase) to the 64-byte
        seed: PBKDF2-HMAC-SHA512, salt `"mnemonic" + passphrase`, 2048
        rounds. Deterministic, no I/O.
    */
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        let salt = Zeroizing::new(format!("mnemonic{}", passphrase));
        let mut seed = Zeroizing::new([0u8; 64]);
        hash::pbkdf2_hmac_sha512(
            self.phrase.as_bytes(),
            salt.as_bytes(),
            SEED_STRETCH_ROUNDS,
            seed.as_mut(),
        );
        seed
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count())
            .field("phrase", &"[redacted]")
            .finish()
    }
}

/**
    Reads 11 bits starting at `bit` from a MSB-first bitstring.
*/
fn extract_11_bits(data: &[u8], bit: usize) -> u16 {
    let mut group = 0u16;
    for i in bit..bit + 11 {
        let set = (data[i / 8] >> (7 - (i % 8))) & 1;
        group = (group << 1) | set as u16;
    }
    group
}

/**
    Rebuilds the entropy from word indices and verifies the embedded
    checksum, returning the entropy on success.
*/
fn decode_indices(indices: &[u16]) -> Result<Zeroizing<Vec<u8>>> {
    let total_bits = indices.len() * 11;
    let entropy_bits = total_bits * 32 / 33;
    let checksum_bits = total_bits - entropy_bits;

    //Pack the 11-bit groups back into a byte buffer, MSB first
    let mut data = Zeroizing::new(vec![0u8; (total_bits + 7) / 8]);
    for (w, index) in indices.iter().enumerate() {
        for i in 0..11 {
            if index & (1 << (10 - i)) != 0 {
                let bit = w * 11 + i;
                data[bit / 8] |= 1 << (7 - (bit % 8));
            }
        }
    }

    let entropy = Zeroizing::new(data[..entropy_bits / 8].to_vec());

    let expected = hash::sha256(&*entropy)[0] >> (8 - checksum_bits);
    let actual = data[entropy_bits / 8] >> (8 - checksum_bits);
    if expected != actual {
        return Err(WalletError::ChecksumMismatch);
    }

    Ok(entropy)
}
