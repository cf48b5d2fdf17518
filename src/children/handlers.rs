use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    children::{
        dto::{ChildCreate, ChildUpdate},
        repo::{Child, ChildRepo},
    },
    error::ApiError,
    repo::{OwnedRepository, Pagination},
    state::AppState,
};

pub fn child_routes() -> Router<AppState> {
    Router::new()
        .route("/children", get(list_children).post(create_child))
        .route(
            "/children/:child_id",
            get(get_child).put(update_child).delete(delete_child),
        )
}

#[instrument(skip(state, user))]
pub async fn list_children(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Child>>, ApiError> {
    let children = ChildRepo
        .scoped(&state.db, user.id)
        .list(p.offset, p.limit)
        .await?;
    Ok(Json(children))
}

#[instrument(skip(state, user, input))]
pub async fn create_child(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ChildCreate>,
) -> Result<(StatusCode, Json<Child>), ApiError> {
    let child = ChildRepo.scoped(&state.db, user.id).create(input).await?;
    info!(child_id = %child.id, parent_id = %user.id, "child profile created");
    Ok((StatusCode::CREATED, Json(child)))
}

#[instrument(skip(state, user))]
pub async fn get_child(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<Uuid>,
) -> Result<Json<Child>, ApiError> {
    let child = ChildRepo.scoped(&state.db, user.id).get(child_id).await?;
    Ok(Json(child))
}

#[instrument(skip(state, user, patch))]
pub async fn update_child(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<Uuid>,
    Json(patch): Json<ChildUpdate>,
) -> Result<Json<Child>, ApiError> {
    let child = ChildRepo
        .scoped(&state.db, user.id)
        .update(child_id, patch)
        .await?;
    info!(child_id = %child.id, "child profile updated");
    Ok(Json(child))
}

#[instrument(skip(state, user))]
pub async fn delete_child(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<Uuid>,
) -> Result<Json<Child>, ApiError> {
    let child = ChildRepo
        .scoped(&state.db, user.id)
        .delete(child_id)
        .await?;
    info!(child_id = %child.id, "child profile deleted");
    Ok(Json(child))
}
