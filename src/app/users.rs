use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::query::{Collection, Column, ColumnKind, ListParams, PageMeta, QueryBuilder};
use crate::domain::user::User;
use crate::infra::db::Db;

const ACTIVE: &str = "ACTIVE";

/// The public user directory. Email is never listed.
pub static USERS: Collection = Collection {
    name: "users",
    source: "users u",
    columns: &[
        Column {
            required: true,
            ..Column::new("id", "u.id", ColumnKind::Uuid)
        },
        Column {
            filterable: true,
            sortable: true,
            ..Column::new("firstName", "u.first_name", ColumnKind::Text)
        },
        Column {
            filterable: true,
            sortable: true,
            ..Column::new("lastName", "u.last_name", ColumnKind::Text)
        },
        Column::new("bio", "u.bio", ColumnKind::Text),
        Column::new("avatarUrl", "u.avatar_url", ColumnKind::Text),
        Column {
            filterable: true,
            ..Column::new("role", "u.role", ColumnKind::Text)
        },
        Column {
            filterable: true,
            ..Column::new("isActive", "u.is_active", ColumnKind::Text)
        },
        Column {
            sortable: true,
            ..Column::new("createdAt", "u.created_at", ColumnKind::Timestamp)
        },
    ],
    default_sort: "-createdAt",
    tiebreak: "id",
};

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> ServiceResult<User> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, email, bio, avatar_url, role, is_active, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref()
            .map(user_from_row)
            .ok_or_else(|| ServiceError::not_found("user not found"))
    }

    pub async fn is_active(&self, user_id: Uuid) -> ServiceResult<bool> {
        let active: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND is_active = $2)",
        )
        .bind(user_id)
        .bind(ACTIVE)
        .fetch_one(self.db.pool())
        .await?;

        Ok(active)
    }

    pub async fn list_users(
        &self,
        params: &ListParams,
    ) -> ServiceResult<(Vec<serde_json::Value>, PageMeta)> {
        let query = QueryBuilder::new(&USERS, params)
            .base("isActive", ACTIVE)
            .filter()
            .search(&["firstName", "lastName"])
            .sort()
            .fields()
            .paginate();

        let (users, meta) = futures::try_join!(query.build(&self.db), query.get_meta(&self.db))?;
        Ok((users, meta))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> ServiceResult<User> {
        let row = sqlx::query(
            "UPDATE users \
             SET first_name = COALESCE($2, first_name), \
                 last_name = COALESCE($3, last_name), \
                 bio = COALESCE($4, bio), \
                 avatar_url = COALESCE($5, avatar_url), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, first_name, last_name, email, bio, avatar_url, role, is_active, created_at",
        )
        .bind(user_id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.bio)
        .bind(changes.avatar_url)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref()
            .map(user_from_row)
            .ok_or_else(|| ServiceError::not_found("user not found"))
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        role: row.get("role"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}
