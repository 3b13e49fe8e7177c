//! API handlers for Orgdesk.
//!
//! Route handlers are grouped by concern: `health` and `root` for liveness,
//! and `orgs` for the organization/user CRUD surface.

pub mod health;
pub mod orgs;
pub mod root;
