//! Event authorization API server library.
//!
//! Exposes config, state, error handling, routes and background jobs so the
//! binaries and the integration tests share one router.

pub mod access;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
