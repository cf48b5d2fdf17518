use axum::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Generic contract for resources that belong to exactly one owner. Every
/// query carries the owner filter, so a row under another owner is
/// indistinguishable from a missing one.
#[async_trait]
pub trait OwnedRepository: Send + Sync {
    type Entity: Send;
    type Create: Send;
    type Update: Send;

    /// Resource name used in not-found messages.
    const RESOURCE: &'static str;

    async fn insert(
        &self,
        db: &PgPool,
        owner_id: Uuid,
        input: Self::Create,
    ) -> Result<Self::Entity, ApiError>;

    async fn find_owned(
        &self,
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self::Entity>, ApiError>;

    async fn list_owned(
        &self,
        db: &PgPool,
        owner_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Self::Entity>, ApiError>;

    /// Partial update: fields absent from `patch` keep their stored value.
    /// Returns `None` when the row does not exist under this owner.
    async fn update_owned(
        &self,
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        patch: Self::Update,
    ) -> Result<Option<Self::Entity>, ApiError>;

    /// Deletes and returns the row's last state, `None` if not owned.
    async fn delete_owned(
        &self,
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self::Entity>, ApiError>;

    /// Binds this repository to one owner for the duration of a request.
    fn scoped<'a>(&'a self, db: &'a PgPool, owner_id: Uuid) -> Scoped<'a, Self>
    where
        Self: Sized,
    {
        Scoped {
            repo: self,
            db,
            owner_id,
        }
    }
}

/// Owner-bound view over an [`OwnedRepository`]. Missing rows surface as
/// `NotFound`, never `Forbidden`, so callers cannot probe for foreign rows.
pub struct Scoped<'a, R> {
    repo: &'a R,
    db: &'a PgPool,
    owner_id: Uuid,
}

impl<'a, R: OwnedRepository> Scoped<'a, R> {
    pub async fn create(&self, input: R::Create) -> Result<R::Entity, ApiError> {
        self.repo.insert(self.db, self.owner_id, input).await
    }

    pub async fn get(&self, id: Uuid) -> Result<R::Entity, ApiError> {
        self.repo
            .find_owned(self.db, id, self.owner_id)
            .await?
            .ok_or(ApiError::NotFound(R::RESOURCE))
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<R::Entity>, ApiError> {
        self.repo
            .list_owned(self.db, self.owner_id, offset, limit)
            .await
    }

    pub async fn update(&self, id: Uuid, patch: R::Update) -> Result<R::Entity, ApiError> {
        self.repo
            .update_owned(self.db, id, self.owner_id, patch)
            .await?
            .ok_or(ApiError::NotFound(R::RESOURCE))
    }

    pub async fn delete(&self, id: Uuid) -> Result<R::Entity, ApiError> {
        self.repo
            .delete_owned(self.db, id, self.owner_id)
            .await?
            .ok_or(ApiError::NotFound(R::RESOURCE))
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").expect("empty pagination");
        assert_eq!(p.offset, 0);
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn pagination_overrides() {
        let p: Pagination =
            serde_json::from_str(r#"{"offset": 10, "limit": 5}"#).expect("pagination");
        assert_eq!(p.offset, 10);
        assert_eq!(p.limit, 5);
    }
}
