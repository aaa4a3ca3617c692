/*
    Wordlist handling for BIP-39 mnemonics.

    The dictionary is an explicit value passed into the codec rather
    than hidden global state, so localized lists drop in without any
    re-plumbing. A list is only usable if it holds exactly 2048 words.
*/

pub mod en;

use crate::error::{Result, WalletError};

/// Number of words every BIP-39 dictionary must contain.
pub const WORDLIST_LEN: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
}

impl Language {
    pub fn wordlist(&self) -> Wordlist {
        match self {
            //The array type already guarantees the 2048 invariant
            Language::English => Wordlist { words: &en::WORDS },
        }
    }
}

#[derive(Clone, Copy)]
pub struct Wordlist {
    words: &'static [&'static str],
}

impl Wordlist {
    /**
        Wraps a caller-provided dictionary, e.g. a localized list.
        Fails with `ConfigurationError` unless it has exactly 2048 entries.
    */
    pub fn from_words(words: &'static [&'static str]) -> Result<Self> {
        if words.len() != WORDLIST_LEN {
            return Err(WalletError::ConfigurationError(format!(
                "wordlist must contain {} words, found {}",
                WORDLIST_LEN,
                words.len()
            )));
        }
        Ok(Self { words })
    }

    /**
        The word at an 11-bit group index.
    */
    pub fn word(&self, index: u16) -> &'static str {
        debug_assert!((index as usize) < WORDLIST_LEN);
        self.words[index as usize]
    }

    /**
        Reverse lookup used when re-encoding a phrase for validation.
    */
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.words.iter().position(|w| *w == word).map(|i| i as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_is_complete_and_sorted() {
        let list = Language::English.wordlist();
        assert_eq!(list.words.len(), WORDLIST_LEN);
        assert!(list.words.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(list.word(0), "abandon");
        assert_eq!(list.word(2047), "zoo");
    }

    #[test]
    fn reverse_lookup_round_trips() {
        let list = Language::English.wordlist();
        assert_eq!(list.index_of("abandon"), Some(0));
        assert_eq!(list.index_of("zoo"), Some(2047));
        assert_eq!(list.index_of("notaword"), None);
    }

    #[test]
    fn short_custom_list_is_rejected() {
        static SHORT: [&str; 3] = ["a", "b", "c"];
        assert!(matches!(
            Wordlist::from_words(&SHORT),
            Err(WalletError::ConfigurationError(_))
        ));
    }
}
