use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::children::dto::{ChildCreate, ChildUpdate};
use crate::error::ApiError;
use crate::repo::OwnedRepository;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Child {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub name: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub learning_style: Option<String>,
    pub preferences: serde_json::Value,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Child profiles, always accessed through the owning parent.
pub struct ChildRepo;

#[async_trait]
impl OwnedRepository for ChildRepo {
    type Entity = Child;
    type Create = ChildCreate;
    type Update = ChildUpdate;

    const RESOURCE: &'static str = "child profile";

    async fn insert(
        &self,
        db: &PgPool,
        owner_id: Uuid,
        input: ChildCreate,
    ) -> Result<Child, ApiError> {
        input.validate()?;
        let child = sqlx::query_as::<_, Child>(
            r#"
            INSERT INTO children (parent_id, name, grade, subjects, learning_style, preferences)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, parent_id, name, grade, subjects, learning_style, preferences,
                      created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(input.name)
        .bind(input.grade)
        .bind(input.subjects)
        .bind(input.learning_style)
        .bind(input.preferences.unwrap_or_else(|| serde_json::json!({})))
        .fetch_one(db)
        .await?;
        Ok(child)
    }

    async fn find_owned(
        &self,
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Child>, ApiError> {
        let child = sqlx::query_as::<_, Child>(
            r#"
            SELECT id, parent_id, name, grade, subjects, learning_style, preferences,
                   created_at, updated_at
            FROM children
            WHERE id = $1 AND parent_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(child)
    }

    async fn list_owned(
        &self,
        db: &PgPool,
        owner_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Child>, ApiError> {
        let children = sqlx::query_as::<_, Child>(
            r#"
            SELECT id, parent_id, name, grade, subjects, learning_style, preferences,
                   created_at, updated_at
            FROM children
            WHERE parent_id = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(children)
    }

    async fn update_owned(
        &self,
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        patch: ChildUpdate,
    ) -> Result<Option<Child>, ApiError> {
        patch.validate()?;
        let child = sqlx::query_as::<_, Child>(
            r#"
            UPDATE children
            SET name = COALESCE($3, name),
                grade = COALESCE($4, grade),
                subjects = COALESCE($5, subjects),
                learning_style = COALESCE($6, learning_style),
                preferences = COALESCE($7, preferences),
                updated_at = now()
            WHERE id = $1 AND parent_id = $2
            RETURNING id, parent_id, name, grade, subjects, learning_style, preferences,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.name)
        .bind(patch.grade)
        .bind(patch.subjects)
        .bind(patch.learning_style)
        .bind(patch.preferences)
        .fetch_optional(db)
        .await?;
        Ok(child)
    }

    async fn delete_owned(
        &self,
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Child>, ApiError> {
        let child = sqlx::query_as::<_, Child>(
            r#"
            DELETE FROM children
            WHERE id = $1 AND parent_id = $2
            RETURNING id, parent_id, name, grade, subjects, learning_style, preferences,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(child)
    }
}
