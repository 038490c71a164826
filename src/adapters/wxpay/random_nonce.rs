//! Random alphanumeric nonces.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::ports::NonceGenerator;

/// Draws nonces from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl NonceGenerator for RandomNonce {
    fn generate(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        assert_eq!(RandomNonce.generate(32).len(), 32);
        assert_eq!(RandomNonce.generate(0), "");
    }

    #[test]
    fn output_is_alphanumeric() {
        assert!(RandomNonce.generate(64).chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn successive_nonces_differ() {
        assert_ne!(RandomNonce.generate(32), RandomNonce.generate(32));
    }
}
