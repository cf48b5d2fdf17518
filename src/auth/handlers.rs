use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterRequest, Token},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::ApiError,
    state::AppState,
    users::{dto::UserOut, repo::User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let mut problems = Vec::new();
    if !is_valid_email(&payload.email) {
        problems.push("email must be a valid address".to_string());
    }
    if payload.password.len() < 8 {
        problems.push("password must be at least 8 characters".to_string());
    }
    if payload.name.trim().is_empty() {
        problems.push("name must not be empty".to_string());
    }
    if !problems.is_empty() {
        warn!(email = %payload.email, ?problems, "registration rejected");
        return Err(ApiError::Validation(problems));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::AlreadyExists("user with this email"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.email, payload.name.trim(), &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(mut form): Form<LoginForm>,
) -> Result<Json<Token>, ApiError> {
    form.username = form.username.trim().to_lowercase();

    // Unknown email and wrong password produce the same signal.
    let user = User::find_by_email(&state.db, &form.username)
        .await?
        .ok_or_else(|| {
            warn!(email = %form.username, "login with unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&form.password, &user.password_hash) {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on inactive account");
        return Err(ApiError::InactiveAccount);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(Token::bearer(access_token)))
}
