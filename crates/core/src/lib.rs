//! Domain types and rules for the event authorization backend.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers call into
//! these functions so every rule can be tested in isolation.

pub mod access;
pub mod attendance;
pub mod authorization;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod upload;
pub mod validation;
pub mod verification;
