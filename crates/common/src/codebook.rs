//! The substitution table owned by every path.
//!
//! A [`Codebook`] always holds exactly one value for each lowercase letter
//! `a` through `z`. Values are free-form strings: they may repeat, may be
//! empty and may equal their key, so a codebook is not guaranteed to be a
//! bijection.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of letters in a codebook
pub const CODEBOOK_SIZE: usize = 26;

/// `ord(key) + ord(value)` for every entry of the default codebook
pub const REFLECTION_CONSTANT: u32 = 219;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CodebookError {
    #[error("malformed codebook: {0}")]
    Malformed(String),
    #[error("missing codebook key: {0}")]
    MissingKey(char),
    #[error("unexpected codebook key: {0:?}")]
    UnexpectedKey(String),
}

/// A fixed 26-entry mapping from the letters a-z to replacement strings.
///
/// Codebooks are immutable values; an edit produces a new codebook.
/// On the wire (and in the database) a codebook is a JSON object keyed by
/// the single-letter strings `"a"` through `"z"`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Codebook([String; CODEBOOK_SIZE]);

impl Codebook {
    /// The built-in reflective table: `a <-> z`, `b <-> y`, ..., `m <-> n`.
    pub fn reflective() -> Self {
        Self(std::array::from_fn(|i| {
            let key = b'a' as u32 + i as u32;
            char::from_u32(REFLECTION_CONSTANT - key)
                .map(String::from)
                .unwrap_or_default()
        }))
    }

    /// Build a codebook from submitted fields.
    ///
    /// Every letter takes the value found under its single-letter key; letters
    /// without a field are blanked. Keys other than a-z are ignored.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self(std::array::from_fn(|i| {
            let key = letter(i).to_string();
            fields.get(&key).cloned().unwrap_or_default()
        }))
    }

    /// Value for `key`, or `None` if `key` is not one of a-z
    pub fn get(&self, key: char) -> Option<&str> {
        index_of(key).map(|i| self.0[i].as_str())
    }

    /// First key (in a-z order) whose value is exactly `value`
    pub fn key_for(&self, value: &str) -> Option<char> {
        self.0.iter().position(|v| v == value).map(letter)
    }

    /// Iterate over `(key, value)` pairs in a-z order
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.0.iter().enumerate().map(|(i, v)| (letter(i), v.as_str()))
    }

    /// Encode into the JSON form stored alongside a claim
    pub fn serialize(&self) -> Result<String, CodebookError> {
        serde_json::to_string(self).map_err(|e| CodebookError::Malformed(e.to_string()))
    }

    /// Decode a codebook previously produced by [`Codebook::serialize`]
    pub fn deserialize(bytes: &[u8]) -> Result<Self, CodebookError> {
        // serde wraps our conversion error in its own message, so go through
        //  the map first to keep the precise error variant
        let map: BTreeMap<String, String> =
            serde_json::from_slice(bytes).map_err(|e| CodebookError::Malformed(e.to_string()))?;
        Self::try_from(map)
    }
}

impl Default for Codebook {
    fn default() -> Self {
        Self::reflective()
    }
}

impl fmt::Debug for Codebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl TryFrom<BTreeMap<String, String>> for Codebook {
    type Error = CodebookError;

    fn try_from(mut map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut values: [String; CODEBOOK_SIZE] = Default::default();
        for (i, slot) in values.iter_mut().enumerate() {
            let key = letter(i);
            *slot = map
                .remove(&key.to_string())
                .ok_or(CodebookError::MissingKey(key))?;
        }
        if let Some(extra) = map.into_keys().next() {
            return Err(CodebookError::UnexpectedKey(extra));
        }
        Ok(Self(values))
    }
}

impl From<Codebook> for BTreeMap<String, String> {
    fn from(codebook: Codebook) -> Self {
        codebook
            .0
            .into_iter()
            .enumerate()
            .map(|(i, v)| (letter(i).to_string(), v))
            .collect()
    }
}

fn letter(index: usize) -> char {
    (b'a' + index as u8) as char
}

fn index_of(key: char) -> Option<usize> {
    key.is_ascii_lowercase().then(|| key as usize - 'a' as usize)
}
