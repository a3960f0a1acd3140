//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the API accepts them
//! - Read-only projections used by specific listings

pub mod attendance;
pub mod authorization;
pub mod campus;
pub mod event;
pub mod user;
