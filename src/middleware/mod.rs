//! Middleware and extractors for the request-security chain.
//!
//! # Modules
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) bearer-token extractor
//! - [`role`]: admin and ownership authorization rules
//! - [`csrf`]: double-submit CSRF token issue and verification
//! - [`rate_limit`]: fixed-window rate limiting per client address
//! - [`security_headers`]: hardened default response headers
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` verifies the JWT and yields the caller's `Identity`
//! 3. The handler (or `RequireAdmin`) applies the matching authorization rule
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::authorize_owner_or_admin;
//!
//! async fn get_user(
//!     AuthUser(identity): AuthUser,
//!     ValidId(id): ValidId,
//! ) -> Result<Json<User>, AppError> {
//!     authorize_owner_or_admin(&identity, id)?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod csrf;
pub mod rate_limit;
pub mod role;
pub mod security_headers;
