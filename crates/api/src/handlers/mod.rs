//! Request handlers, one module per resource.

pub mod attendance;
pub mod auth;
pub mod authorizations;
pub mod campuses;
pub mod events;
pub mod public;
pub mod submission;
pub mod users;
