//! # estatehub-auth
//!
//! Authentication for EstateHub.
//!
//! ## Modules
//!
//! - `jwt`: HS256 token issuing and validation
//! - `password`: Argon2id hashing and the minimum-length policy
//! - `identity`: cache of identities resolved from token subjects
//! - `authenticator`: bearer token to user identity

pub mod authenticator;
pub mod identity;
pub mod jwt;
pub mod password;

pub use authenticator::Authenticator;
pub use identity::IdentityCache;
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
