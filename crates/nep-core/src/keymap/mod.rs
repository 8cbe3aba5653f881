//! QWERTY-to-Devanagari keymap and the transliteration it drives.
//!
//! The keymap is strictly one character in, one character out. There are no
//! sequence rules: every key is looked up on its own and anything that is
//! not a key passes through unchanged.

mod config;
mod table;

use std::collections::HashMap;
use std::sync::OnceLock;

pub use config::{parse_keymap_toml, KeymapConfigError};
pub use table::default_toml;

use table::DEFAULT_TOML;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();
static INSTANCE: OnceLock<Keymap> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Keymap {
    map: HashMap<char, char>,
    /// Entries in key order, for listing.
    entries: Vec<(char, char)>,
}

impl Keymap {
    /// Set custom TOML before first `global()` call. Fails with
    /// `AlreadyInitialized` once the global keymap exists or a custom table
    /// was already installed.
    pub fn init_custom(toml_content: String) -> Result<(), KeymapConfigError> {
        // Validate eagerly
        parse_keymap_toml(&toml_content)?;
        if INSTANCE.get().is_some() {
            return Err(KeymapConfigError::AlreadyInitialized);
        }
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| KeymapConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static Keymap {
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            Keymap::from_toml(toml_str).expect("keymap TOML must be valid")
        })
    }

    /// Build a standalone keymap, independent of the global one.
    pub fn from_toml(toml_str: &str) -> Result<Keymap, KeymapConfigError> {
        parse_keymap_toml(toml_str).map(Keymap::from_pairs)
    }

    fn from_pairs(entries: Vec<(char, char)>) -> Keymap {
        let map = entries.iter().copied().collect();
        Keymap { map, entries }
    }

    pub fn get(&self, key: char) -> Option<char> {
        self.map.get(&key).copied()
    }

    pub fn contains_key(&self, key: char) -> bool {
        self.map.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(char, char)] {
        &self.entries
    }

    /// Replace every key in `input` with its mapped character.
    ///
    /// Characters that are not keys are copied through, so the output always
    /// has exactly as many `char`s as the input.
    pub fn transliterate(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 3);
        for c in input.chars() {
            out.push(self.get(c).unwrap_or(c));
        }
        out
    }

    /// True if `transliterate(text) == text`, without allocating.
    pub fn is_fixed_point(&self, text: &str) -> bool {
        text.chars().all(|c| self.get(c).map_or(true, |v| v == c))
    }
}

/// Transliterate with the global keymap.
pub fn transliterate(input: &str) -> String {
    Keymap::global().transliterate(input)
}
