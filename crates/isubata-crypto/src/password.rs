use rand::Rng;
use rand::distr::Alphanumeric;
use sha1::{Digest, Sha1};

/// Length of the salt generated at registration.
pub const SALT_LEN: usize = 20;

/// `n` characters drawn uniformly from `[A-Za-z0-9]`.
pub fn random_string(n: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(n)
        .map(char::from)
        .collect()
}

/// Lowercase hex of SHA-1(salt ‖ password).
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(salt: &str, password: &str, digest: &str) -> bool {
    hash_password(salt, password) == digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_string_is_alphanumeric() {
        let s = random_string(SALT_LEN);
        assert_eq!(s.len(), SALT_LEN);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(random_string(0).is_empty());
    }

    #[test]
    fn hash_matches_known_digest() {
        // sha1("abc")
        assert_eq!(
            hash_password("a", "bc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let salt = random_string(SALT_LEN);
        let digest = hash_password(&salt, "hunter2");
        assert!(verify_password(&salt, "hunter2", &digest));
        assert!(!verify_password(&salt, "hunter3", &digest));
        assert!(!verify_password("other-salt", "hunter2", &digest));
    }
}
