//! Slug and secret-token generation.
//!
//! Slugs are public and only need to be hard to collide; tokens are bearer
//! credentials and are always drawn from the operating system CSPRNG.

use crate::constants::{SLUG_LEN, TOKEN_LEN};
use rand::rngs::OsRng;
use rand::Rng;

/// URL-safe alphabet (64 symbols, 6 bits per character).
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generate an 8-character public slug.
pub fn generate_slug() -> String {
    random_string(&mut rand::thread_rng(), SLUG_LEN)
}

/// Generate a 32-character secret token from the OS random source.
pub fn generate_token() -> String {
    random_string(&mut OsRng, TOKEN_LEN)
}

/// Check that `value` has the shape of a generated slug.
pub fn is_valid_slug(value: &str) -> bool {
    value.len() == SLUG_LEN && value.bytes().all(|byte| ALPHABET.contains(&byte))
}

/// Compare a stored token against a presented one.
///
/// Both sides are hashed first so the comparison cost does not depend on how
/// long a shared prefix is; `blake3::Hash` equality is constant-time.
pub fn tokens_match(expected: &str, candidate: &str) -> bool {
    blake3::hash(expected.as_bytes()) == blake3::hash(candidate.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugs_are_url_safe_and_fixed_length() {
        for _ in 0..200 {
            let slug = generate_slug();
            assert_eq!(slug.len(), SLUG_LEN);
            assert!(is_valid_slug(&slug), "unexpected slug shape: {}", slug);
        }
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let tokens: HashSet<String> = (0..100).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 100);
        assert!(tokens.iter().all(|token| token.len() == TOKEN_LEN));
    }

    #[test]
    fn slug_validation_rejects_wrong_shapes() {
        assert!(is_valid_slug("abc_DE-9"));
        assert!(!is_valid_slug("short"));
        assert!(!is_valid_slug("abc/DE-9"));
        assert!(!is_valid_slug("abcdefghi"));
    }

    #[test]
    fn token_comparison_requires_exact_match() {
        let token = generate_token();
        assert!(tokens_match(&token, &token.clone()));
        assert!(!tokens_match(&token, &token[..TOKEN_LEN - 1]));
        assert!(!tokens_match("abcdefgh", "abcdefgH"));
        assert!(!tokens_match(&token, ""));
    }
}
