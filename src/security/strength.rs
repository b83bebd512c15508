//! Master password policy and password strength scoring.

use std::collections::HashSet;

use crate::errors::{PassVaultError, Result};

/// Minimum master password length.
pub const MIN_MASTER_PASSWORD_LEN: usize = 8;

/// Check a candidate master password against the policy.
///
/// Rules are checked in order and the first failure is reported:
/// length, uppercase, lowercase, digit, special character.
pub fn validate_master_password(password: &str) -> Result<()> {
    let rule = |ok: bool, msg: &str| {
        if ok {
            Ok(())
        } else {
            Err(PassVaultError::Validation(msg.to_string()))
        }
    };

    rule(
        password.chars().count() >= MIN_MASTER_PASSWORD_LEN,
        "Master password must be at least 8 characters long",
    )?;
    rule(
        password.chars().any(|c| c.is_ascii_uppercase()),
        "Master password must contain at least one uppercase letter",
    )?;
    rule(
        password.chars().any(|c| c.is_ascii_lowercase()),
        "Master password must contain at least one lowercase letter",
    )?;
    rule(
        password.chars().any(|c| c.is_ascii_digit()),
        "Master password must contain at least one number",
    )?;
    rule(
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
        "Master password must contain at least one special character",
    )
}

/// Coarse strength bucket for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=19 => Self::VeryWeak,
            20..=39 => Self::Weak,
            40..=59 => Self::Medium,
            60..=79 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        };
        f.write_str(text)
    }
}

/// Score a password from 0 to 100.
///
/// - length: 2 points per character, max 30
/// - character classes: 10 each for lower, upper, digit, symbol
/// - uniqueness: ratio of distinct characters × 30
/// - penalties: 2 per run of three consecutive code points (max 20) and
///   2 per triple repeat (max 20)
pub fn strength_score(password: &str) -> u8 {
    let chars: Vec<char> = password.chars().collect();
    if chars.is_empty() {
        return 0;
    }
    let len = chars.len();

    let mut score = (len * 2).min(30) as i64;

    let classes = [
        chars.iter().any(|c| c.is_ascii_lowercase()),
        chars.iter().any(|c| c.is_ascii_uppercase()),
        chars.iter().any(|c| c.is_ascii_digit()),
        chars.iter().any(|c| !c.is_ascii_alphanumeric()),
    ];
    score += 10 * classes.iter().filter(|&&present| present).count() as i64;

    let unique = chars.iter().collect::<HashSet<_>>().len();
    score += ((unique * 30) / len).min(30) as i64;

    score -= (count_sequential_runs(&chars) * 2).min(20) as i64;
    score -= (count_repeats(&chars) * 2).min(20) as i64;

    score.clamp(0, 100) as u8
}

/// Count windows of three consecutive code points, either all digits
/// ("123") or all non-digits ("abc", "#$%").
fn count_sequential_runs(chars: &[char]) -> usize {
    chars
        .windows(3)
        .filter(|w| {
            let lower: Vec<char> = w.iter().map(|c| c.to_ascii_lowercase()).collect();
            let digits = lower.iter().filter(|c| c.is_ascii_digit()).count();
            (digits == 0 || digits == 3)
                && lower[1] as u32 == lower[0] as u32 + 1
                && lower[2] as u32 == lower[0] as u32 + 2
        })
        .count()
}

/// Count windows of three identical characters.
fn count_repeats(chars: &[char]) -> usize {
    chars
        .windows(3)
        .filter(|w| w[0] == w[1] && w[1] == w[2])
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_policy_compliant_passwords() {
        assert!(validate_master_password("Abcd123!").is_ok());
        assert!(validate_master_password("Abcd1234!").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let err = validate_master_password("short").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn reports_first_missing_class() {
        let err = validate_master_password("alllowercase1").unwrap_err();
        assert!(err.to_string().contains("uppercase"));

        let err = validate_master_password("ALLUPPERCASE1!").unwrap_err();
        assert!(err.to_string().contains("lowercase"));

        let err = validate_master_password("NoDigitsHere!").unwrap_err();
        assert!(err.to_string().contains("number"));

        let err = validate_master_password("NoSymbols123").unwrap_err();
        assert!(err.to_string().contains("special character"));
    }

    #[test]
    fn empty_password_scores_zero() {
        assert_eq!(strength_score(""), 0);
    }

    #[test]
    fn varied_password_scores_higher_than_repetitive() {
        let strong = strength_score("T7#qLm!2vR$x");
        let weak = strength_score("aaaaaaaa");
        assert!(strong > weak);
        assert_eq!(StrengthLabel::from_score(strong), StrengthLabel::VeryStrong);
        assert!(StrengthLabel::from_score(weak) <= StrengthLabel::Weak);
    }

    #[test]
    fn sequences_are_penalised() {
        assert!(strength_score("abcdefgh") < strength_score("agdbhecf"));
    }

    #[test]
    fn known_score() {
        // len 8 -> 16, classes lower+digit -> 20, unique 8/8 -> 30,
        // runs "abc","bcd","123","234" -> -8
        assert_eq!(strength_score("abcd1234"), 58);
    }

    #[test]
    fn symbol_runs_are_penalised() {
        // len 8 -> 16, symbols -> 10, unique -> 30, six runs -> -12
        assert_eq!(strength_score("!\"#$%&'("), 44);
    }

    #[test]
    fn mixed_digit_windows_are_not_runs() {
        // '/' '0' '1' are consecutive code points but mix digit and symbol.
        assert_eq!(count_sequential_runs(&['/', '0', '1']), 0);
        assert_eq!(count_sequential_runs(&['x', 'y', 'z']), 1);
    }

    #[test]
    fn label_boundaries() {
        assert_eq!(StrengthLabel::from_score(19), StrengthLabel::VeryWeak);
        assert_eq!(StrengthLabel::from_score(20), StrengthLabel::Weak);
        assert_eq!(StrengthLabel::from_score(40), StrengthLabel::Medium);
        assert_eq!(StrengthLabel::from_score(60), StrengthLabel::Strong);
        assert_eq!(StrengthLabel::from_score(80), StrengthLabel::VeryStrong);
        assert_eq!(StrengthLabel::VeryStrong.to_string(), "Very Strong");
    }
}
