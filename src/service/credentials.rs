//! Password hashing and opaque token generation.
//!
//! Passwords are derived with PBKDF2-HMAC-SHA256 over a random per-user
//! salt; both the 256-bit derived key and the 128-bit salt are stored as
//! lowercase hex. There is no scheme version field alongside the hash, so
//! changing `PBKDF2_ITERATIONS` invalidates previously stored hashes.

use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;

/// Deployment constant. Raising it requires rehashing stored credentials.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const SALT_BYTES: usize = 16;
const DERIVED_KEY_BYTES: usize = 32;
const TOKEN_BYTES: usize = 32;

/// Derive a password hash. When `salt` is `None` a fresh random salt is
/// generated; passing the stored salt reproduces the stored hash for
/// comparison. Returns `(hash_hex, salt_hex)`.
pub fn hash_password(password: &str, salt: Option<&str>) -> (String, String) {
    let salt = match salt {
        Some(salt) => salt.to_string(),
        None => generate_salt(),
    };

    let mut derived = [0u8; DERIVED_KEY_BYTES];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS, &mut derived);

    (hex::encode(derived), salt)
}

/// Recompute the hash with the stored salt and compare. Output is
/// fixed-length hex of a one-way derivation, so exact string equality is the
/// comparison the scheme calls for.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let (hash, _) = hash_password(password, Some(salt));
    hash == expected_hash
}

/// Random 128-bit salt, lowercase hex (32 characters).
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Random 256-bit opaque token, lowercase hex (64 characters). Used for both
/// verification tokens and session tokens.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn hashing_is_deterministic_for_a_given_salt() {
        let (hash1, salt) = hash_password("password1", None);
        let (hash2, salt2) = hash_password("password1", Some(&salt));
        assert_eq!(hash1, hash2);
        assert_eq!(salt, salt2);
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let (hash1, salt1) = hash_password("password1", None);
        let (hash2, salt2) = hash_password("password1", None);
        assert_ne!(salt1, salt2);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn hash_and_salt_have_fixed_hex_lengths() {
        let (hash, salt) = hash_password("password1", None);
        assert_eq!(hash.len(), 64);
        assert_eq!(salt.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn a_thousand_salts_do_not_collide() {
        let salts: HashSet<String> = (0..1000).map(|_| generate_salt()).collect();
        assert_eq!(salts.len(), 1000);
    }

    #[test]
    fn verify_accepts_correct_password() {
        let (hash, salt) = hash_password("password1", None);
        assert!(verify_password("password1", &salt, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let (hash, salt) = hash_password("password1", None);
        assert!(!verify_password("password2", &salt, &hash));
    }

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let token1 = generate_token();
        let token2 = generate_token();
        assert_eq!(token1.len(), 64);
        assert!(token1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token1, token2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn any_password_round_trips_through_verify(password in ".{0,48}") {
            let (hash, salt) = hash_password(&password, None);
            prop_assert!(verify_password(&password, &salt, &hash));
        }
    }
}
