//! Core entity definitions for the task tracker.
//!
//! This crate defines the two entity types the service stores, users and the
//! tasks they own, together with the inputs used to create them and the
//! validation predicates shared by every store backend.

mod task;
mod user;

pub use task::*;
pub use user::*;

/// Returns true if the string contains anything other than whitespace.
pub fn is_non_empty(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Returns true if the string names a member of [`TaskStatus`].
pub fn is_valid_status(s: &str) -> bool {
    TaskStatus::parse(s).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_non_empty() {
        assert!(is_non_empty("a"));
        assert!(is_non_empty("  a "));
        assert!(!is_non_empty(""));
        assert!(!is_non_empty("   \t"));
    }

    #[test]
    fn test_is_valid_status() {
        assert!(is_valid_status("open"));
        assert!(is_valid_status("in_progress"));
        assert!(is_valid_status("done"));
        assert!(!is_valid_status("archived"));
        assert!(!is_valid_status("Open"));
        assert!(!is_valid_status(""));
    }
}
