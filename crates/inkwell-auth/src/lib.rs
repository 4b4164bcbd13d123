//! # Inkwell Auth
//!
//! Stateless identity tokens for the Inkwell API.
//!
//! - [`identity`]: the caller [`Identity`] (`{id, role}`) and the closed
//!   [`Role`] set
//! - [`claims`]: the JWT payload ([`Claims`])
//! - [`jwt`]: issuing and verifying tokens, with the [`TokenError`] taxonomy
//!
//! Tokens are HS256 JWTs signed with the process-wide `JWT_SECRET`. Nothing is
//! stored server-side: a token stays valid until it expires or the secret
//! changes.
//!
//! # Example
//!
//! ```ignore
//! use inkwell_auth::{Identity, Role, issue_token, verify_token};
//! use inkwell_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = issue_token(&Identity::new(7, Role::User), &config)?;
//!
//! let identity = verify_token(&token, &config)?;
//! assert_eq!(identity.id, 7);
//! ```

pub mod claims;
pub mod identity;
pub mod jwt;

pub use claims::Claims;
pub use identity::{Identity, ParseRoleError, Role};
pub use jwt::{TokenError, decode_claims_at, issue_token, issue_token_at, verify_token, verify_token_at};
