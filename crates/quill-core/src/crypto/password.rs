//! Password policy and generation.
//!
//! The strength check is advisory: the codec encrypts with any non-empty
//! password. The CLI uses the report to gate the lock flow and to explain to
//! the user what is missing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{QuillError, Result};

/// Minimum password length the policy asks for.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters the policy counts as special.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Fixed 70-character generator alphabet: upper, lower, digits, common
/// symbols.
const GENERATOR_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Qualitative strength label derived from the criteria score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    #[serde(rename = "weak")]
    Weak,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "very strong")]
    VeryStrong,
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very strong",
        };
        write!(f, "{}", label)
    }
}

/// Result of scoring a candidate password against the five policy criteria.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthReport {
    /// Number of satisfied criteria (0-5)
    pub score: u8,

    /// Qualitative label for the score
    pub strength: Strength,

    /// Human-readable feedback for each unmet criterion
    pub feedback: Vec<String>,

    /// Whether the policy accepts this password (score >= 3)
    pub is_valid: bool,
}

/// Score a password against five criteria: minimum length, uppercase,
/// lowercase, digit, special character.
///
/// Pure and synchronous; never fails.
///
/// # Examples
///
/// ```
/// use quill_core::crypto::check_password_strength;
///
/// let report = check_password_strength("Tr0ub4dor&3");
/// assert_eq!(report.score, 5);
/// assert!(report.is_valid);
/// ```
pub fn check_password_strength(password: &str) -> StrengthReport {
    let mut score = 0u8;
    let mut feedback = Vec::new();

    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        score += 1;
    } else {
        feedback.push(format!("At least {} characters", MIN_PASSWORD_LENGTH));
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    } else {
        feedback.push("Include uppercase letters".to_string());
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    } else {
        feedback.push("Include lowercase letters".to_string());
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    } else {
        feedback.push("Include numbers".to_string());
    }

    if password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        score += 1;
    } else {
        feedback.push("Include special characters".to_string());
    }

    let strength = match score {
        0..=2 => Strength::Weak,
        3 => Strength::Medium,
        4 => Strength::Strong,
        _ => Strength::VeryStrong,
    };

    StrengthReport {
        score,
        strength,
        feedback,
        is_valid: score >= 3,
    }
}

/// Generate a random password of the given length from the fixed 70-character
/// alphabet.
///
/// Each character is drawn uniformly via rejection sampling over a CSPRNG,
/// so no alphabet position is favored. The result is suitable to hand
/// directly to the encryption codec, and (for reasonable lengths) satisfies
/// the strength policy.
pub fn generate_password(length: usize) -> Result<String> {
    if length == 0 {
        return Err(QuillError::InvalidInput(
            "Password length must be at least 1".to_string(),
        ));
    }

    let alphabet_len = GENERATOR_ALPHABET.len() as u8;
    // Largest multiple of the alphabet size that fits in a byte; bytes at or
    // above it are rejected to keep the draw uniform.
    let reject_above = u8::MAX - (u8::MAX % alphabet_len);

    let mut password = String::with_capacity(length);
    let mut buffer = [0u8; 32];
    while password.len() < length {
        getrandom::getrandom(&mut buffer)
            .map_err(|e| QuillError::Crypto(format!("Random source unavailable: {}", e)))?;
        for &byte in &buffer {
            if byte >= reject_above {
                continue;
            }
            password.push(GENERATOR_ALPHABET[(byte % alphabet_len) as usize] as char);
            if password.len() == length {
                break;
            }
        }
    }

    Ok(password)
}

/// One-way hash of a password (SHA-256, base64-encoded).
///
/// Not used by the codec itself; provided for callers that want a cheap
/// equality check on a password they already hold, without keeping the
/// plaintext around.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    STANDARD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password() {
        let report = check_password_strength("abc");
        assert!(report.score <= 1);
        assert_eq!(report.strength, Strength::Weak);
        assert!(!report.is_valid);
        assert!(report
            .feedback
            .iter()
            .any(|f| f.contains("At least 8 characters")));
    }

    #[test]
    fn test_very_strong_password() {
        let report = check_password_strength("Tr0ub4dor&3");
        assert_eq!(report.score, 5);
        assert_eq!(report.strength, Strength::VeryStrong);
        assert!(report.is_valid);
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn test_medium_boundary() {
        // Length + lowercase + digits, no uppercase, no specials
        let report = check_password_strength("abcdef123");
        assert_eq!(report.score, 3);
        assert_eq!(report.strength, Strength::Medium);
        assert!(report.is_valid);
        assert_eq!(report.feedback.len(), 2);
    }

    #[test]
    fn test_strong_boundary() {
        let report = check_password_strength("Abcdef123");
        assert_eq!(report.score, 4);
        assert_eq!(report.strength, Strength::Strong);
    }

    #[test]
    fn test_empty_password_feedback_lists_every_criterion() {
        let report = check_password_strength("");
        assert_eq!(report.score, 0);
        assert_eq!(report.feedback.len(), 5);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_strength_labels() {
        assert_eq!(Strength::VeryStrong.to_string(), "very strong");
        assert_eq!(Strength::Weak.to_string(), "weak");
        assert_eq!(
            serde_json::to_string(&Strength::VeryStrong).unwrap(),
            "\"very strong\""
        );
    }

    #[test]
    fn test_generated_password_length_and_alphabet() {
        let password = generate_password(16).unwrap();
        assert_eq!(password.chars().count(), 16);
        assert!(password
            .bytes()
            .all(|b| GENERATOR_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_password_satisfies_policy() {
        // At this length the chance of missing three of the five criteria is
        // negligible, so the assertion is stable.
        let password = generate_password(64).unwrap();
        assert!(check_password_strength(&password).is_valid);
    }

    #[test]
    fn test_generated_passwords_differ() {
        let a = generate_password(16).unwrap();
        let b = generate_password(16).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(generate_password(0).is_err());
    }

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(hash_password("secret"), hash_password("secret"));
        assert_ne!(hash_password("secret"), hash_password("other"));
    }
}
