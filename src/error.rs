use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Closed set of request outcomes. Handlers and repositories return these;
/// the HTTP mapping lives in the `IntoResponse` impl below.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Login with an unknown email or a wrong password. Deliberately does not
    /// say which factor failed.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// Valid credentials for a deactivated account. Only surfaced at login;
    /// mid-session it collapses into `Unauthenticated`.
    #[error("inactive user")]
    InactiveAccount,

    /// Missing, malformed, expired or otherwise unverifiable token.
    #[error("could not validate credentials")]
    Unauthenticated,

    /// Authenticated but not allowed to perform the requested action.
    #[error("not enough permissions")]
    Forbidden,

    /// The resource does not exist, or exists under a different owner.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input broke one or more domain invariants. Carries every violated rule.
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InactiveAccount => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            ApiError::Validation(problems) => json!(problems),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                json!("internal server error")
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                json!("internal server error")
            }
            other => json!(other.to_string()),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if matches!(self, ApiError::InvalidCredentials | ApiError::Unauthenticated) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, "Bearer".parse().unwrap());
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InactiveAccount.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("child profile").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation(vec!["x".into()]).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::AlreadyExists("user with this email").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_detail_lists_every_problem() {
        let err = ApiError::Validation(vec![
            "password must be at least 8 characters".into(),
            "email must be a valid address".into(),
        ]);
        let body = body_json(err.into_response()).await;
        let detail = body["detail"].as_array().expect("detail array");
        assert_eq!(detail.len(), 2);
    }

    #[tokio::test]
    async fn internal_detail_stays_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("secret connection string"));
        let body = body_json(err.into_response()).await;
        assert_eq!(body["detail"], "internal server error");
    }

    #[tokio::test]
    async fn unauthenticated_sets_challenge_header() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let body = body_json(ApiError::NotFound("child profile").into_response()).await;
        assert_eq!(body["detail"], "child profile not found");
    }
}
