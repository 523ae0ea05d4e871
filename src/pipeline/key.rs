//! Content-addressed cache keys.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Hashes a serializable input record together with extra revisions.
///
/// Two calls with equal records and equal `revisions` produce equal keys
/// within one process.
pub fn content_key<T: Serialize + ?Sized>(value: &T, revisions: &[u64]) -> u64 {
    let mut hasher = DefaultHasher::new();
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.hash(&mut hasher),
        Err(err) => {
            tracing::warn!("Could not serialize cache input: {}", err);
            u64::MAX.hash(&mut hasher);
        }
    }
    revisions.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Input {
        density: u32,
        opacity: f32,
    }

    #[test]
    fn test_equal_inputs_equal_keys() {
        let a = content_key(&Input { density: 10, opacity: 0.5 }, &[7]);
        let b = content_key(&Input { density: 10, opacity: 0.5 }, &[7]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_change_changes_key() {
        let base = content_key(&Input { density: 10, opacity: 0.5 }, &[7]);
        assert_ne!(base, content_key(&Input { density: 11, opacity: 0.5 }, &[7]));
        assert_ne!(base, content_key(&Input { density: 10, opacity: 0.25 }, &[7]));
        assert_ne!(base, content_key(&Input { density: 10, opacity: 0.5 }, &[8]));
    }
}
