//! Authorization rules.
//!
//! Every decision here is a pure function of the caller's [`Identity`] and,
//! where relevant, the id of the user owning the target resource. Admins
//! bypass ownership checks everywhere except comment authorship.

use axum::{extract::FromRequestParts, http::request::Parts};
use inkwell_auth::{Identity, Role};
use inkwell_core::AppError;

use crate::metrics::track_security_rejection;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn forbidden(message: &str) -> AppError {
    track_security_rejection("forbidden");
    AppError::forbidden(message)
}

pub fn authorize_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(forbidden(
            "Access denied. Administrator privileges required.",
        ))
    }
}

/// Allows the owner of a resource, or any admin.
pub fn authorize_owner_or_admin(identity: &Identity, owner_id: i64) -> Result<(), AppError> {
    if identity.is_admin() || identity.id == owner_id {
        Ok(())
    } else {
        Err(forbidden("Access denied"))
    }
}

/// Allows only the user named in the request; admins get no bypass.
pub fn authorize_self(identity: &Identity, user_id: i64) -> Result<(), AppError> {
    if identity.id == user_id {
        Ok(())
    } else {
        Err(forbidden("Access denied"))
    }
}

/// Decides the role to write on a user update.
///
/// Returns `Ok(None)` when the stored role must be kept. Admins may set any
/// role; a non-admin may only resubmit the role they already hold.
pub fn resolve_role_update(
    identity: &Identity,
    requested: Option<Role>,
) -> Result<Option<Role>, AppError> {
    if identity.is_admin() {
        return Ok(requested);
    }

    match requested {
        Some(role) if role != identity.role => Err(forbidden("You cannot change your role")),
        _ => Ok(None),
    }
}

/// Decides the `author_id` to write on an article update: only admins may
/// reassign an article.
pub fn resolve_article_author(identity: &Identity, requested: i64, stored: i64) -> i64 {
    if identity.is_admin() { requested } else { stored }
}

/// Extractor for admin-only handlers.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        authorize_admin(&identity)?;
        Ok(RequireAdmin(identity))
    }
}
