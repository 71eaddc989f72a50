//! Shared building blocks for the pricecast crates.
//!
//! Re-exports the error crate so every binary spells it the same way.

pub use anyhow::{Error, Result, anyhow, bail};

pub mod utils;

/// Creates a random identifier, used to tag reported errors.
pub fn create_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_id_is_unique_and_compact() {
        let a = create_id();
        let b = create_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
