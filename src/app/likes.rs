use anyhow::anyhow;
use sqlx::postgres::PgRow;
use sqlx::{Executor, Postgres, Row};
use uuid::Uuid;

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::query::{Collection, Column, ColumnKind, ListParams, PageMeta, QueryBuilder};
use crate::domain::like::{Like, LikeTransition, TargetType};
use crate::infra::db::Db;

/// Likes joined to the liking user's public profile.
pub static LIKERS: Collection = Collection {
    name: "likers",
    source: "likes l JOIN users u ON u.id = l.user_id",
    columns: &[
        Column {
            required: true,
            ..Column::new("id", "l.id", ColumnKind::Uuid)
        },
        Column::new("targetType", "l.target_type", ColumnKind::Text),
        Column::new("targetId", "l.target_id", ColumnKind::Uuid),
        Column::new("userId", "l.user_id", ColumnKind::Uuid),
        Column::new(
            "user",
            "jsonb_build_object('id', u.id, 'firstName', u.first_name, \
             'lastName', u.last_name, 'avatarUrl', u.avatar_url)",
            ColumnKind::Json,
        ),
        Column {
            sortable: true,
            ..Column::new("createdAt", "l.created_at", ColumnKind::Timestamp)
        },
    ],
    default_sort: "-createdAt",
    tiebreak: "id",
};

/// Maintains like records and the denormalized `likes_count` on their targets.
///
/// Each transition runs in one transaction: the like row and the counter
/// adjustment commit together or not at all. The counter is only ever moved
/// with an in-database `+1`/`-1`, never read back and rewritten.
#[derive(Clone)]
pub struct LikeService {
    db: Db,
}

impl LikeService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn like_target(
        &self,
        target_type: TargetType,
        target_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<LikeTransition> {
        let target = target_type.table();
        let mut tx = self.db.pool().begin().await?;

        if !target_is_live(&mut *tx, target_type, target_id).await? {
            tx.rollback().await?;
            return Err(ServiceError::not_found(target.not_found));
        }

        // The unique (target_type, target_id, user_id) index decides races: a
        // concurrent duplicate blocks here until the first commits, then
        // inserts nothing.
        let row = sqlx::query(
            "INSERT INTO likes (target_type, target_id, user_id) VALUES ($1, $2, $3) \
             ON CONFLICT (target_type, target_id, user_id) DO NOTHING \
             RETURNING id, target_type, target_id, user_id, created_at",
        )
        .bind(target_type.as_db())
        .bind(target_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(ServiceError::conflict("already liked"));
        };
        let like = like_from_row(&row)?;

        let likes_count: Option<i64> = sqlx::query_scalar(&format!(
            "UPDATE {table} SET {count} = {count} + 1 \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING {count}",
            table = target.table,
            count = target.count_column,
        ))
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Soft-deleted between the existence check and the increment.
        let Some(likes_count) = likes_count else {
            tx.rollback().await?;
            return Err(ServiceError::not_found(target.not_found));
        };

        tx.commit().await?;

        Ok(LikeTransition { like, likes_count })
    }

    pub async fn unlike_target(
        &self,
        target_type: TargetType,
        target_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<LikeTransition> {
        let target = target_type.table();
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(
            "DELETE FROM likes \
             WHERE target_type = $1 AND target_id = $2 AND user_id = $3 \
             RETURNING id, target_type, target_id, user_id, created_at",
        )
        .bind(target_type.as_db())
        .bind(target_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(ServiceError::not_found("like not found"));
        };
        let like = like_from_row(&row)?;

        // Clamped at zero; the schema also rejects negative counts.
        let likes_count: Option<i64> = sqlx::query_scalar(&format!(
            "UPDATE {table} SET {count} = GREATEST({count} - 1, 0) \
             WHERE id = $1 \
             RETURNING {count}",
            table = target.table,
            count = target.count_column,
        ))
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LikeTransition {
            like,
            likes_count: likes_count.unwrap_or(0),
        })
    }

    pub async fn get_likers(
        &self,
        target_type: TargetType,
        target_id: Uuid,
        params: &ListParams,
    ) -> ServiceResult<(Vec<serde_json::Value>, PageMeta)> {
        if !self.target_exists(target_type, target_id).await? {
            return Err(ServiceError::not_found(target_type.table().not_found));
        }

        let query = QueryBuilder::new(&LIKERS, params)
            .base("targetType", target_type.as_db())
            .base("targetId", target_id)
            .paginate();

        let (likers, meta) =
            futures::try_join!(query.build(&self.db), query.get_meta(&self.db))?;

        Ok((likers, meta))
    }

    pub async fn check_if_liked(
        &self,
        target_type: TargetType,
        target_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<bool> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM likes \
                WHERE target_type = $1 AND target_id = $2 AND user_id = $3 \
             )",
        )
        .bind(target_type.as_db())
        .bind(target_id)
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(liked)
    }

    /// Whether the target exists and is not soft-deleted.
    pub async fn target_exists(
        &self,
        target_type: TargetType,
        target_id: Uuid,
    ) -> ServiceResult<bool> {
        target_is_live(self.db.pool(), target_type, target_id).await
    }
}

async fn target_is_live<'c, E>(
    executor: E,
    target_type: TargetType,
    target_id: Uuid,
) -> ServiceResult<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND is_deleted = FALSE)",
        target_type.table().table
    ))
    .bind(target_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

fn like_from_row(row: &PgRow) -> ServiceResult<Like> {
    let target_type: String = row.try_get("target_type")?;
    let target_type = TargetType::from_db(&target_type)
        .ok_or_else(|| anyhow!("unknown like target type: {}", target_type))?;

    Ok(Like {
        id: row.try_get("id")?,
        target_type,
        target_id: row.try_get("target_id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}
