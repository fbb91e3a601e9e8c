use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use rand::RngCore;
use sha2::Sha256;

use crate::error::{AppError, AppResult};

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Salted PBKDF2-HMAC-SHA256 password hashing
///
/// Hashes are stored as `pbkdf2-sha256$<rounds>$<salt>$<key>` with base64
/// salt and key, so verification does not depend on the current round count.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let key = derive(password, &salt, self.iterations);
        format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(key)
        )
    }

    /// Checks a password against a stored hash; malformed hashes never match
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let mut parts = stored.split('$');
        let (Some(SCHEME), Some(rounds), Some(salt), Some(key), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };
        let (Ok(rounds), Ok(salt), Ok(expected)) = (
            rounds.parse::<u32>(),
            STANDARD_NO_PAD.decode(salt),
            STANDARD_NO_PAD.decode(key),
        ) else {
            return false;
        };
        if rounds == 0 {
            return false;
        }

        let actual = derive(password, &salt, rounds);
        constant_time_eq(&actual, &expected)
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn spawn_hash(self, password: String) -> AppResult<String> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn spawn_verify(self, password: String, stored: String) -> AppResult<bool> {
        tokio::task::spawn_blocking(move || self.verify(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    pbkdf2::pbkdf2_hmac_array::<Sha256, KEY_LEN>(password.as_bytes(), salt, iterations)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(1_000);
        let stored = hasher.hash("correct horse");
        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(hasher.verify("correct horse", &stored));
        assert!(!hasher.verify("battery staple", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(1_000);
        assert_ne!(hasher.hash("same"), hasher.hash("same"));
    }

    #[test]
    fn test_verify_uses_stored_round_count() {
        let stored = PasswordHasher::new(500).hash("pw");
        assert!(PasswordHasher::new(2_000).verify("pw", &stored));
    }

    #[tokio::test]
    async fn test_spawned_hash_and_verify_agree_with_sync() {
        let hasher = PasswordHasher::new(1_000);
        let stored = hasher.spawn_hash("pw".to_string()).await.unwrap();
        assert!(hasher.verify("pw", &stored));
        assert!(hasher
            .spawn_verify("pw".to_string(), stored.clone())
            .await
            .unwrap());
        assert!(!hasher
            .spawn_verify("nope".to_string(), stored)
            .await
            .unwrap());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = PasswordHasher::new(1_000);
        assert!(!hasher.verify("pw", ""));
        assert!(!hasher.verify("pw", "pw"));
        assert!(!hasher.verify("pw", "md5$1$abc$def"));
        assert!(!hasher.verify("pw", "pbkdf2-sha256$0$c2FsdA$a2V5"));
        assert!(!hasher.verify("pw", "pbkdf2-sha256$x$c2FsdA$a2V5"));
    }
}
