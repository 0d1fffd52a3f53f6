//! User accounts: registration, login and administration.

pub mod service;
pub mod validation;

pub use service::{AuthSession, RegisterUser, UpdateUserRequest, UserService};
