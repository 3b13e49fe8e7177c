//! # Orgdesk (B2B Organizations Management API)
//!
//! `orgdesk` is a small CRUD backend for managing organizations, their users,
//! and per-organization pending requests, backed by PostgreSQL.
//!
//! ## Tenant Model (Organizations, Users, Pending Requests)
//!
//! Organizations are the tenant boundary. Each organization owns a set of
//! users and a set of pending requests.
//!
//! - **Slugs:** Every organization carries a globally unique `slug`; the
//!   database enforces uniqueness and duplicates map to `409 Conflict`.
//! - **Cascade Deletes:** Deleting an organization removes all of its users
//!   and pending requests in the same statement via foreign-key cascades.
//! - **Partial Updates:** `PUT` endpoints apply only the fields present in
//!   the payload. For nullable fields an explicit `null` clears the column,
//!   while an absent field leaves it untouched.
//! - **Seeding:** Creating an organization seeds a configurable number of
//!   placeholder pending requests (`--pending-seed`, default 45, 0 disables).

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
