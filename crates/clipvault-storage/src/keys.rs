//! File ID generation and validation shared by blob backends.
//!
//! File IDs are random (v4) UUIDs rendered in lowercase hyphenated form. Only that exact
//! rendering is accepted back, so every blob has exactly one on-disk name and no caller
//! supplied ID can reach outside the storage root.

use uuid::Uuid;

/// Generate a fresh file ID.
pub fn new_file_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Return `file_id` if it is a canonical file ID, `None` otherwise.
pub fn canonical_file_id(file_id: &str) -> Option<&str> {
    let parsed = Uuid::parse_str(file_id).ok()?;
    if parsed.hyphenated().to_string() == file_id {
        Some(file_id)
    } else {
        None
    }
}
