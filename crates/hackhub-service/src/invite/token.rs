//! Link invite token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Lower bound on token entropy regardless of configuration.
const MIN_TOKEN_BYTES: usize = 16;

/// Generates unguessable, URL-safe invite link tokens.
#[derive(Debug, Clone)]
pub struct LinkTokenGenerator {
    bytes: usize,
}

impl LinkTokenGenerator {
    /// Creates a generator producing tokens from `bytes` random bytes.
    pub fn new(bytes: usize) -> Self {
        Self {
            bytes: bytes.max(MIN_TOKEN_BYTES),
        }
    }

    /// Generates a fresh token.
    pub fn generate(&self) -> String {
        let raw: Vec<u8> = (0..self.bytes).map(|_| rand::random::<u8>()).collect();
        URL_SAFE_NO_PAD.encode(raw)
    }
}

impl Default for LinkTokenGenerator {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_url_safe() {
        let token = LinkTokenGenerator::default().generate();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tokens_differ() {
        let generator = LinkTokenGenerator::default();
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_entropy_floor() {
        let token = LinkTokenGenerator::new(4).generate();
        // 16 bytes encode to 22 characters without padding.
        assert_eq!(token.len(), 22);
    }
}
