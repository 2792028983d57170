use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::query::{Collection, Column, ColumnKind, ListParams, PageMeta, QueryBuilder};
use crate::domain::comment::Comment;
use crate::infra::db::Db;

pub static COMMENTS: Collection = Collection {
    name: "comments",
    source: "comments c JOIN users u ON u.id = c.author_id",
    columns: &[
        Column {
            required: true,
            ..Column::new("id", "c.id", ColumnKind::Uuid)
        },
        Column::new("postId", "c.post_id", ColumnKind::Uuid),
        Column {
            filterable: true,
            ..Column::new("authorId", "c.author_id", ColumnKind::Uuid)
        },
        Column::new(
            "author",
            "jsonb_build_object('id', u.id, 'firstName', u.first_name, \
             'lastName', u.last_name, 'avatarUrl', u.avatar_url)",
            ColumnKind::Json,
        ),
        Column::new("body", "c.body", ColumnKind::Text),
        Column {
            filterable: true,
            sortable: true,
            ..Column::new("likesCount", "c.likes_count", ColumnKind::Integer)
        },
        Column {
            filterable: true,
            ..Column::new("isDeleted", "c.is_deleted", ColumnKind::Boolean)
        },
        Column {
            sortable: true,
            ..Column::new("createdAt", "c.created_at", ColumnKind::Timestamp)
        },
    ],
    default_sort: "-createdAt",
    tiebreak: "id",
};

#[derive(Clone)]
pub struct CommentService {
    db: Db,
}

impl CommentService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        body: String,
    ) -> ServiceResult<Comment> {
        let mut tx = self.db.pool().begin().await?;

        let bumped: Option<Uuid> = sqlx::query_scalar(
            "UPDATE posts SET comments_count = comments_count + 1 \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING id",
        )
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;

        if bumped.is_none() {
            tx.rollback().await?;
            return Err(ServiceError::not_found("post not found"));
        }

        let row = sqlx::query(
            "INSERT INTO comments (post_id, author_id, body) VALUES ($1, $2, $3) \
             RETURNING id, post_id, author_id, body, likes_count, created_at",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(comment_from_row(&row))
    }

    pub async fn list_comments(
        &self,
        post_id: Uuid,
        params: &ListParams,
    ) -> ServiceResult<(Vec<serde_json::Value>, PageMeta)> {
        let post_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(post_id)
        .fetch_one(self.db.pool())
        .await?;
        if !post_exists {
            return Err(ServiceError::not_found("post not found"));
        }

        let query = QueryBuilder::new(&COMMENTS, params)
            .base("postId", post_id)
            .base("isDeleted", false)
            .filter()
            .sort()
            .fields()
            .paginate();

        let (comments, meta) =
            futures::try_join!(query.build(&self.db), query.get_meta(&self.db))?;
        Ok((comments, meta))
    }

    pub async fn recent_comments(&self, post_id: Uuid, limit: i64) -> ServiceResult<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, post_id, author_id, body, likes_count, created_at \
             FROM comments \
             WHERE post_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2",
        )
        .bind(post_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    /// Soft delete by the comment's author, releasing its slot in the post's
    /// comment counter.
    pub async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(
            "SELECT author_id, post_id FROM comments \
             WHERE id = $1 AND is_deleted = FALSE \
             FOR UPDATE",
        )
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(ServiceError::not_found("comment not found"));
        };
        let author_id: Uuid = row.get("author_id");
        let post_id: Uuid = row.get("post_id");

        if author_id != user_id {
            tx.rollback().await?;
            return Err(ServiceError::forbidden(
                "you are not authorized to delete this comment",
            ));
        }

        sqlx::query("UPDATE comments SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE posts SET comments_count = GREATEST(comments_count - 1, 0) WHERE id = $1",
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        author_id: row.get("author_id"),
        body: row.get("body"),
        likes_count: row.get("likes_count"),
        created_at: row.get("created_at"),
    }
}
