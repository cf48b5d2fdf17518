use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        extractors::{ensure_self_or_superuser, CurrentUser, Superuser},
        handlers::is_valid_email,
        password::hash_password,
    },
    error::ApiError,
    repo::Pagination,
    state::AppState,
    users::{
        dto::{UpdateMe, UserOut},
        repo::{User, UserChanges},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me).put(update_me))
        .route("/users/:user_id", get(get_user))
        .route("/users", get(list_users))
}

/// Get the current user's own profile.
#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserOut> {
    Json(user.into())
}

#[instrument(skip(state, user, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateMe>,
) -> Result<Json<UserOut>, ApiError> {
    let email = payload.email.map(|e| e.trim().to_lowercase());

    let mut problems = Vec::new();
    if let Some(email) = &email {
        if !is_valid_email(email) {
            problems.push("email must be a valid address".to_string());
        }
    }
    if let Some(password) = &payload.password {
        if password.len() < 8 {
            problems.push("password must be at least 8 characters".to_string());
        }
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            problems.push("name must not be empty".to_string());
        }
    }
    if !problems.is_empty() {
        return Err(ApiError::Validation(problems));
    }

    if let Some(email) = &email {
        match User::find_by_email(&state.db, email).await? {
            Some(existing) if existing.id != user.id => {
                warn!(user_id = %user.id, "profile update to an email already in use");
                return Err(ApiError::AlreadyExists("user with this email"));
            }
            _ => {}
        }
    }

    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let changes = UserChanges {
        email,
        name: payload.name,
        password_hash,
        ..UserChanges::default()
    };
    let updated = User::update(&state.db, user.id, changes)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(updated.into()))
}

/// Get a user by id; own profile unless the caller is a superuser.
#[instrument(skip(state, user))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserOut>, ApiError> {
    ensure_self_or_superuser(&user, user_id)?;
    let target = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(target.into()))
}

/// List all users. Superusers only.
#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    Superuser(_admin): Superuser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<UserOut>>, ApiError> {
    let users = User::list(&state.db, p.offset, p.limit).await?;
    Ok(Json(users.into_iter().map(UserOut::from).collect()))
}
