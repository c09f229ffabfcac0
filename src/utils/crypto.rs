//! Random values for the OAuth flow

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Length in bytes of the random OAuth state before encoding
pub const STATE_BYTES: usize = 32;

/// Generate an unguessable OAuth `state` value (URL-safe base64, no padding)
#[must_use]
pub fn generate_oauth_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two secrets without short-circuiting on the first mismatch
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_url_safe_and_unique() {
        let first = generate_oauth_state();
        let second = generate_oauth_state();
        assert_ne!(first, second);
        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(first.len(), 43);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(!constant_time_eq("", "abc"));
    }

    #[test]
    fn test_constant_time_eq_matches_generated_state() {
        let state = generate_oauth_state();
        assert!(constant_time_eq(&state, &state));

        let mut tampered = state.clone().into_bytes();
        tampered[42] = if tampered[42] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(!constant_time_eq(&state, &tampered));
    }
}
