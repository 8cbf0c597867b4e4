//! Аватар пользователя через Gravatar.

use sha2::{Digest, Sha256};

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";

/// URL аватара для email: хеш SHA-256 от адреса в нижнем регистре без
/// пробелов, запасной вариант `identicon`.
pub fn gravatar_url(email: &str, size: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    format!("{GRAVATAR_BASE}/{:x}?s={size}&d=identicon", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_before_hashing() {
        assert_eq!(
            gravatar_url("  Ann@Example.COM ", 40),
            gravatar_url("ann@example.com", 40)
        );
    }

    #[test]
    fn url_carries_hash_size_and_fallback() {
        let url = gravatar_url("", 40);
        assert_eq!(
            url,
            "https://www.gravatar.com/avatar/\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855?s=40&d=identicon"
        );
    }
}
