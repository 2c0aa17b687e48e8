//! Email and password shape checks used before any credential work.

use regex::Regex;

/// Email addresses have a practical limit of 254 bytes.
const MAX_EMAIL_LEN: usize = 254;
/// RFC 5321 caps the local part at 64 octets.
const MAX_LOCAL_PART_LEN: usize = 64;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 254;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Normalize an email address: trim whitespace, strip trailing dots, lowercase.
///
/// Trailing dots and whitespace are stripped together so that interleaved
/// runs like `". . "` disappear in one pass.
pub fn normalize(email: &str) -> String {
    email
        .trim_start()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_lowercase()
}

/// Holds the compiled email pattern. Build once at startup and share.
#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            // The pattern is a constant; failing to compile it is a programming error.
            email: Regex::new(EMAIL_PATTERN).expect("email pattern must compile"),
        }
    }

    /// Checks whether the normalized email has a plausible shape and length.
    pub fn is_valid_email(&self, email: &str) -> bool {
        let email = normalize(email);
        if email.len() > MAX_EMAIL_LEN || !self.email.is_match(&email) {
            return false;
        }

        match email.rfind('@') {
            Some(at) => email[..at].len() <= MAX_LOCAL_PART_LEN,
            None => false,
        }
    }

    /// Password must be between 8 and 254 bytes once surrounding whitespace is trimmed.
    pub fn is_valid_password(&self, password: &str) -> bool {
        let len = password.trim().len();
        (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
