//! Data models for the LogiTag application.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod log_entry;
mod tag;
mod user;

pub use log_entry::*;
pub use tag::*;
pub use user::*;
