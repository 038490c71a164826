//! Nonce source for signed requests.

/// Produces random strings usable as `nonce_str`.
///
/// Implementations must return at least `len` characters drawn from
/// `[A-Za-z0-9]` so the value needs no escaping on the wire.
pub trait NonceGenerator: Send + Sync {
    fn generate(&self, len: usize) -> String;
}
