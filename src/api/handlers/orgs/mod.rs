//! Organization and user endpoints.
//!
//! Organizations are the tenant boundary: each one owns users and pending
//! requests, and deleting an organization cascades to both child tables.
//! `PUT` endpoints use partial-update-by-presence semantics: only fields
//! present in the payload are written, and for nullable fields an explicit
//! `null` clears the column while an absent field leaves it untouched.
//!
//! This module is split into small route-focused files plus a shared storage
//! layer so the HTTP surface stays easy to read and the SQL logic stays easy
//! to test. The handler modules only parse inputs and map the high-level
//! flow, while `storage` owns database queries and response shaping.
//!
//! Creating an organization also seeds a configurable number of placeholder
//! pending requests, a demo fixture inherited from the product's first
//! deployment. The count comes from `ServerConfig::pending_seed` so it can be
//! turned off.

pub(crate) mod organizations;
pub(crate) mod users;

mod storage;
mod types;

#[cfg(test)]
mod tests;
