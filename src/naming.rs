//! Bucket naming grammar.
//!
//! Names are checked against four rules, in order, and the first rule that
//! fails is the one reported:
//!
//! 1. every character is an ASCII letter, digit, `-`, `_`, or `.`;
//! 2. the first character is a letter or digit;
//! 3. the last character is a letter or digit;
//! 4. the length is between 3 and 63 characters inclusive.

use crate::error::{Error, Result};

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 63;

/// Naming rule violated by a rejected bucket name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingRule {
    /// A character outside letters, digits, `-`, `_`, `.`.
    InvalidCharacter,
    /// The name does not start with a letter or digit.
    InvalidStart,
    /// The name does not end with a letter or digit.
    InvalidEnd,
    /// The name is shorter than 3 or longer than 63 characters.
    InvalidLength,
}

impl NamingRule {
    /// Human readable description of the rule.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidCharacter => "Bucket names can only contain letters, numbers, -, _, or .",
            Self::InvalidStart => "Bucket names can only start with letters or numbers.",
            Self::InvalidEnd => "Bucket names can only end with letters or numbers.",
            Self::InvalidLength => "Bucket names must contain 3 to 63 letters.",
        }
    }
}

/// Checks `name` against the bucket naming rules.
pub fn validate_bucket_name(name: &str) -> Result<()> {
    match violated_rule(name) {
        None => Ok(()),
        Some(rule) => Err(Error::Naming {
            name: name.to_string(),
            rule,
        }),
    }
}

fn violated_rule(name: &str) -> Option<NamingRule> {
    let bytes = name.as_bytes();

    let is_allowed = |b: u8| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.');
    if bytes.is_empty() || !bytes.iter().all(|&b| is_allowed(b)) {
        return Some(NamingRule::InvalidCharacter);
    }

    if !bytes[0].is_ascii_alphanumeric() {
        return Some(NamingRule::InvalidStart);
    }

    if !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return Some(NamingRule::InvalidEnd);
    }

    if !(MIN_LEN..=MAX_LEN).contains(&bytes.len()) {
        return Some(NamingRule::InvalidLength);
    }

    None
}
