//! Encode and decode text through a [`Codebook`].
//!
//! Both directions work one character at a time and let spaces through
//! untouched. Characters with no counterpart in the codebook are dropped
//! rather than copied, so output can be shorter than input.

use crate::codebook::Codebook;

const PASSTHROUGH: char = ' ';

/// Replace every letter of `text` with its codebook value.
///
/// Lookups are exact: uppercase letters, digits and punctuation are not keys
/// and produce no output. A value may be empty or longer than one character.
pub fn encode(codebook: &Codebook, text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut out, c| {
            if c == PASSTHROUGH {
                out.push(c);
            } else if let Some(value) = codebook.get(c) {
                out.push_str(value);
            }
            out
        })
}

/// Replace every character of `text` with the first letter that encodes to it.
///
/// When several letters share a value the earliest letter wins, so decoding
/// is not the inverse of [`encode`] for codebooks with repeated values.
pub fn decode(codebook: &Codebook, text: &str) -> String {
    let mut buf = [0; 4];
    text.chars()
        .fold(String::with_capacity(text.len()), |mut out, c| {
            if c == PASSTHROUGH {
                out.push(c);
            } else if let Some(key) = codebook.key_for(c.encode_utf8(&mut buf)) {
                out.push(key);
            }
            out
        })
}
