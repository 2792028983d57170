use anyhow::anyhow;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use crate::app::comments::CommentService;
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::likes::LikeService;
use crate::app::query::{Collection, Column, ColumnKind, ListParams, PageMeta, QueryBuilder};
use crate::domain::like::TargetType;
use crate::domain::post::{Media, Post, PostDetail, PostVisibility};
use crate::infra::db::Db;

const TOP_COMMENTS: i64 = 3;

const POST_COLUMNS: &str = "id, author_id, text, media, visibility, likes_count, comments_count, \
                            tags, pinned, created_at, updated_at";

pub static POSTS: Collection = Collection {
    name: "posts",
    source: "posts p JOIN users u ON u.id = p.author_id",
    columns: &[
        Column {
            required: true,
            ..Column::new("id", "p.id", ColumnKind::Uuid)
        },
        Column {
            filterable: true,
            ..Column::new("authorId", "p.author_id", ColumnKind::Uuid)
        },
        Column::new(
            "author",
            "jsonb_build_object('id', u.id, 'firstName', u.first_name, \
             'lastName', u.last_name, 'avatarUrl', u.avatar_url)",
            ColumnKind::Json,
        ),
        Column::new("text", "p.text", ColumnKind::Text),
        Column::new("media", "p.media", ColumnKind::Json),
        Column {
            filterable: true,
            ..Column::new("visibility", "p.visibility", ColumnKind::Text)
        },
        Column {
            filterable: true,
            sortable: true,
            ..Column::new("likesCount", "p.likes_count", ColumnKind::Integer)
        },
        Column {
            filterable: true,
            sortable: true,
            ..Column::new("commentsCount", "p.comments_count", ColumnKind::Integer)
        },
        Column {
            filterable: true,
            ..Column::new("tags", "p.tags", ColumnKind::TextArray)
        },
        Column {
            filterable: true,
            sortable: true,
            ..Column::new("pinned", "p.pinned", ColumnKind::Boolean)
        },
        Column {
            filterable: true,
            ..Column::new("isDeleted", "p.is_deleted", ColumnKind::Boolean)
        },
        Column {
            sortable: true,
            ..Column::new("createdAt", "p.created_at", ColumnKind::Timestamp)
        },
        Column {
            sortable: true,
            ..Column::new("updatedAt", "p.updated_at", ColumnKind::Timestamp)
        },
    ],
    default_sort: "-createdAt",
    tiebreak: "id",
};

#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub media: Vec<Media>,
    pub visibility: PostVisibility,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub visibility: Option<PostVisibility>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
}

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_post(&self, author_id: Uuid, new_post: NewPost) -> ServiceResult<Post> {
        let row = sqlx::query(&format!(
            "INSERT INTO posts (author_id, text, media, visibility, tags) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(author_id)
        .bind(new_post.text)
        .bind(Json(new_post.media))
        .bind(new_post.visibility.as_db())
        .bind(new_post.tags)
        .fetch_one(self.db.pool())
        .await?;

        post_from_row(&row)
    }

    /// Public, non-deleted posts from everyone.
    pub async fn feed(&self, params: &ListParams) -> ServiceResult<(Vec<serde_json::Value>, PageMeta)> {
        let query = QueryBuilder::new(&POSTS, params)
            .base("visibility", PostVisibility::Public.as_db())
            .base("isDeleted", false)
            .filter()
            .search(&["text"])
            .sort()
            .fields()
            .paginate();

        let (posts, meta) = futures::try_join!(query.build(&self.db), query.get_meta(&self.db))?;
        Ok((posts, meta))
    }

    /// Posts by one author. Private posts are only listed for the author.
    pub async fn timeline(
        &self,
        author_id: Uuid,
        viewer_id: Option<Uuid>,
        params: &ListParams,
    ) -> ServiceResult<(Vec<serde_json::Value>, PageMeta)> {
        let author_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(author_id)
                .fetch_one(self.db.pool())
                .await?;
        if !author_exists {
            return Err(ServiceError::not_found("user not found"));
        }

        let mut query = QueryBuilder::new(&POSTS, params)
            .base("authorId", author_id)
            .base("isDeleted", false);
        if viewer_id != Some(author_id) {
            query = query.base("visibility", PostVisibility::Public.as_db());
        }
        let query = query.filter().sort().fields().paginate();

        let (posts, meta) = futures::try_join!(query.build(&self.db), query.get_meta(&self.db))?;
        Ok((posts, meta))
    }

    pub async fn get_post(&self, post_id: Uuid, viewer_id: Option<Uuid>) -> ServiceResult<PostDetail> {
        let row = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(post_id)
        .fetch_optional(self.db.pool())
        .await?;

        let post = match row {
            Some(row) => post_from_row(&row)?,
            None => return Err(ServiceError::not_found("post not found")),
        };
        if post.visibility == PostVisibility::Private && viewer_id != Some(post.author_id) {
            return Err(ServiceError::not_found("post not found"));
        }

        let liked_by_viewer = match viewer_id {
            Some(viewer_id) => Some(
                LikeService::new(self.db.clone())
                    .check_if_liked(TargetType::Post, post.id, viewer_id)
                    .await?,
            ),
            None => None,
        };
        let top_comments = CommentService::new(self.db.clone())
            .recent_comments(post.id, TOP_COMMENTS)
            .await?;

        Ok(PostDetail {
            post,
            liked_by_viewer,
            top_comments,
        })
    }

    pub async fn update_post(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        changes: PostChanges,
    ) -> ServiceResult<Post> {
        self.ensure_author(post_id, user_id, "update").await?;

        let row = sqlx::query(&format!(
            "UPDATE posts \
             SET text = COALESCE($3, text), \
                 visibility = COALESCE($4, visibility), \
                 tags = COALESCE($5, tags), \
                 pinned = COALESCE($6, pinned), \
                 updated_at = NOW() \
             WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(post_id)
        .bind(user_id)
        .bind(changes.text)
        .bind(changes.visibility.map(|visibility| visibility.as_db()))
        .bind(changes.tags)
        .bind(changes.pinned)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => post_from_row(&row),
            None => Err(ServiceError::not_found("post not found")),
        }
    }

    /// Soft delete; likes and comments stay in place.
    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        self.ensure_author(post_id, user_id, "delete").await?;

        let result = sqlx::query(
            "UPDATE posts SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("post not found"));
        }
        Ok(())
    }

    async fn ensure_author(&self, post_id: Uuid, user_id: Uuid, action: &str) -> ServiceResult<()> {
        let author_id: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1 AND is_deleted = FALSE")
                .bind(post_id)
                .fetch_optional(self.db.pool())
                .await?;

        match author_id {
            Some(author_id) if author_id == user_id => Ok(()),
            Some(_) => Err(ServiceError::forbidden(format!(
                "you are not authorized to {} this post",
                action
            ))),
            None => Err(ServiceError::not_found("post not found")),
        }
    }
}

fn post_from_row(row: &PgRow) -> ServiceResult<Post> {
    let visibility: String = row.get("visibility");
    let visibility = PostVisibility::from_db(&visibility)
        .ok_or_else(|| anyhow!("unknown post visibility: {}", visibility))?;
    let media: Json<Vec<Media>> = row.try_get("media")?;

    Ok(Post {
        id: row.get("id"),
        author_id: row.get("author_id"),
        text: row.get("text"),
        media: media.0,
        visibility,
        likes_count: row.get("likes_count"),
        comments_count: row.get("comments_count"),
        tags: row.get("tags"),
        pinned: row.get("pinned"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
