//! Unique identifier source backed by random (v4) UUIDs.

use uuid::Uuid;

/// Return a fresh identifier, formatted as a lowercase hyphenated UUID.
pub fn next_id() -> String {
    Uuid::new_v4().to_string()
}
