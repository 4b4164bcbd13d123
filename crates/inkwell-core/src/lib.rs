//! # Inkwell Core
//!
//! Core types shared by every Inkwell crate:
//!
//! - [`errors`]: the [`AppError`] type and its HTTP response mapping
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use inkwell_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! if !verify_password("secure_password", &hash)? {
//!     return Err(AppError::unauthorized("Invalid email or password"));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorResponse};
pub use password::{hash_password, verify_password};
