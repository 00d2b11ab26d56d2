//! Identifier generation for widgets created without an explicit `id`.

use std::sync::atomic::{AtomicI64, Ordering};

const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random suffix used for default widget ids.
pub const DEFAULT_ID_LEN: usize = 4;

// Internal ID management for tick routing
static LAST_INSTANCE: AtomicI64 = AtomicI64::new(0);

/// Returns a process-unique instance key, starting from 1.
pub(crate) fn next_instance() -> i64 {
    LAST_INSTANCE.fetch_add(1, Ordering::SeqCst) + 1
}

/// Builds `"{key}_"` followed by `len` random alphanumeric characters.
///
/// Collisions are unlikely but possible; the result is a label, not a secret.
///
/// ```rust
/// use bubbletea_countdown::id::rand_id;
///
/// let id = rand_id("timer", 4);
/// assert!(id.starts_with("timer_"));
/// assert_eq!(id.len(), "timer_".len() + 4);
/// ```
pub fn rand_id(key: &str, len: usize) -> String {
    let mut id = String::with_capacity(key.len() + 1 + len);
    id.push_str(key);
    id.push('_');
    for _ in 0..len {
        id.push(CHARS[rand::random_range(0..CHARS.len())] as char);
    }
    id
}
