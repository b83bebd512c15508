//! Random password generator.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::{PassVaultError, Result};

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Shortest password the generator will produce.
pub const MIN_LENGTH: usize = 4;

/// Longest password the generator will produce.
pub const MAX_LENGTH: usize = 128;

/// Length used when none is given.
pub const DEFAULT_LENGTH: usize = 16;

/// Which character classes to draw from, and how many characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Generate a password using the thread-local CSPRNG.
///
/// Every enabled class is guaranteed at least one character.  With no
/// class enabled, lowercase letters are used.
pub fn generate_password(options: &GeneratorOptions) -> Result<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(PassVaultError::Validation(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH}"
        )));
    }

    let mut classes: Vec<&[u8]> = [
        (options.uppercase, UPPERCASE),
        (options.lowercase, LOWERCASE),
        (options.digits, DIGITS),
        (options.symbols, SYMBOLS),
    ]
    .into_iter()
    .filter_map(|(enabled, set)| enabled.then_some(set))
    .collect();
    if classes.is_empty() {
        classes.push(LOWERCASE);
    }

    let pool: Vec<u8> = classes.concat();
    let mut rng = rand::rng();

    // One from each class first, then fill and shuffle.
    let mut out: Vec<u8> = classes
        .iter()
        .map(|set| set[rng.random_range(0..set.len())])
        .collect();
    while out.len() < options.length {
        out.push(pool[rng.random_range(0..pool.len())]);
    }
    out.shuffle(&mut rng);

    // All character sets are ASCII.
    String::from_utf8(out).map_err(|e| PassVaultError::SerializationError(e.to_string()))
}
