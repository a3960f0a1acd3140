//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod authorization_repo;
pub mod campus_repo;
pub mod event_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use authorization_repo::AuthorizationRepo;
pub use campus_repo::CampusRepo;
pub use event_repo::EventRepo;
pub use user_repo::UserRepo;
