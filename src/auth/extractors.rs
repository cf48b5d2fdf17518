use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, error::ApiError, state::AppState, users::repo::User};

/// Extracts the authenticated user for a protected request: bearer token →
/// verified claims → live user row. Token validity is always re-checked
/// against current user state, so a deleted or deactivated account is locked
/// out as soon as its next request arrives.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthenticated)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthenticated
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token subject no longer exists");
                ApiError::Unauthenticated
            })?;

        if !user.is_active {
            warn!(user_id = %user.id, "token presented for inactive account");
            return Err(ApiError::Unauthenticated);
        }

        Ok(CurrentUser(user))
    }
}

/// Superuser-only gate for admin endpoints.
pub struct Superuser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Superuser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            warn!(user_id = %user.id, "superuser endpoint called without privileges");
            return Err(ApiError::Forbidden);
        }
        Ok(Superuser(user))
    }
}

/// A caller may act on another user's record only when it is their own or
/// they are a superuser.
pub fn ensure_self_or_superuser(user: &User, target_id: Uuid) -> Result<(), ApiError> {
    if user.id == target_id || user.is_superuser {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn make_user(is_superuser: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "parent@example.com".into(),
            name: "Parent".into(),
            password_hash: "hash".into(),
            is_active: true,
            is_superuser,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn self_access_is_allowed() {
        let user = make_user(false);
        assert!(ensure_self_or_superuser(&user, user.id).is_ok());
    }

    #[test]
    fn superuser_may_access_anyone() {
        let admin = make_user(true);
        assert!(ensure_self_or_superuser(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn cross_account_access_is_forbidden() {
        let user = make_user(false);
        let err = ensure_self_or_superuser(&user, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
