//! Short-link token generation.
//!
//! Tokens are fixed-length alphanumeric strings. Uniqueness is enforced by
//! the `short_links.url_hash` unique constraint; callers retry with a fresh
//! token when an insert loses that race.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::constants::SHORT_LINK_TOKEN_LEN;

pub fn generate_token() -> String {
    token_of_len(SHORT_LINK_TOKEN_LEN)
}

fn token_of_len(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_has_configured_length() {
        assert_eq!(generate_token().len(), SHORT_LINK_TOKEN_LEN);
    }

    #[test]
    fn test_token_is_alphanumeric() {
        for _ in 0..100 {
            let token = generate_token();
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()), "{}", token);
        }
    }

    #[test]
    fn test_tokens_vary() {
        let a = token_of_len(15);
        let b = token_of_len(15);
        // 15 alphanumeric chars colliding by chance is effectively impossible
        assert_ne!(a, b);
    }
}
