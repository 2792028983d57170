use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::comments::CommentService;
use crate::app::likes::LikeService;
use crate::app::posts::{NewPost, PostChanges, PostService};
use crate::app::query::{ListParams, PageMeta};
use crate::app::users::{ProfileChanges, UserService};
use crate::domain::comment::Comment;
use crate::domain::like::{LikeTransition, TargetType};
use crate::domain::post::{Media, Post, PostDetail, PostVisibility};
use crate::domain::user::{PublicUser, User};
use crate::http::{AppError, AuthUser};
use crate::AppState;

const MAX_POST_TEXT_LEN: usize = 2000;
const MAX_COMMENT_LEN: usize = 1000;
const MAX_NAME_LEN: usize = 50;
const MAX_BIO_LEN: usize = 500;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> ListResponse<T> {
    fn new((items, meta): (Vec<T>, PageMeta)) -> Json<Self> {
        Json(Self { items, meta })
    }
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    let service = UserService::new(state.db.clone());
    let page = service
        .list_users(&params)
        .await
        .map_err(|err| AppError::from_service(err, "failed to list users"))?;

    Ok(ListResponse::new(page))
}

pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.db.clone());
    let user = service
        .get_user(auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch user"))?;

    Ok(Json(user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let first_name = payload
        .first_name
        .map(|name| validate_name("firstName", name))
        .transpose()?;
    let last_name = payload
        .last_name
        .map(|name| validate_name("lastName", name))
        .transpose()?;
    if let Some(bio) = &payload.bio {
        if bio.chars().count() > MAX_BIO_LEN {
            return Err(AppError::bad_request("bio must be at most 500 characters"));
        }
    }

    let changes = ProfileChanges {
        first_name,
        last_name,
        bio: payload.bio,
        avatar_url: payload.avatar_url,
    };

    let service = UserService::new(state.db.clone());
    let user = service
        .update_profile(auth.user_id, changes)
        .await
        .map_err(|err| AppError::from_service(err, "failed to update profile"))?;

    Ok(Json(user))
}

fn validate_name(field: &str, name: String) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request(format!("{} is required", field)));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

pub async fn get_user(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PublicUser>, AppError> {
    let service = UserService::new(state.db.clone());
    let user = service
        .get_user(id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch user"))?;

    Ok(Json(user.into()))
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub text: String,
    #[serde(default)]
    pub media: Vec<Media>,
    pub visibility: Option<PostVisibility>,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let text = validate_post_text(payload.text)?;
    if payload
        .media
        .iter()
        .any(|media| media.url.trim().is_empty() || media.kind.trim().is_empty())
    {
        return Err(AppError::bad_request("media url and type are required"));
    }

    let new_post = NewPost {
        text,
        media: payload.media,
        visibility: payload.visibility.unwrap_or(PostVisibility::Public),
        tags: payload.tags,
    };

    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(auth.user_id, new_post)
        .await
        .map_err(|err| AppError::from_service(err, "failed to create post"))?;

    tracing::info!(post_id = %post.id, author_id = %auth.user_id, "post created");

    Ok((StatusCode::CREATED, Json(post)))
}

fn validate_post_text(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::bad_request("post text is required"));
    }
    if text.chars().count() > MAX_POST_TEXT_LEN {
        return Err(AppError::bad_request(
            "post text cannot exceed 2000 characters",
        ));
    }
    Ok(text)
}

pub async fn feed(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    let service = PostService::new(state.db.clone());
    let page = service
        .feed(&params)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch feed"))?;

    Ok(ListResponse::new(page))
}

pub async fn user_timeline(
    Path(user_id): Path<Uuid>,
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    let viewer_id = auth.map(|user| user.user_id);
    let service = PostService::new(state.db.clone());
    let page = service
        .timeline(user_id, viewer_id, &params)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch posts"))?;

    Ok(ListResponse::new(page))
}

pub async fn get_post(
    Path(id): Path<Uuid>,
    auth: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<PostDetail>, AppError> {
    let viewer_id = auth.map(|user| user.user_id);
    let service = PostService::new(state.db.clone());
    let post = service
        .get_post(id, viewer_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch post"))?;

    Ok(Json(post))
}

#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub text: Option<String>,
    pub visibility: Option<PostVisibility>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
}

pub async fn update_post(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let text = payload.text.map(validate_post_text).transpose()?;
    let changes = PostChanges {
        text,
        visibility: payload.visibility,
        tags: payload.tags,
        pinned: payload.pinned,
    };

    let service = PostService::new(state.db.clone());
    let post = service
        .update_post(id, auth.user_id, changes)
        .await
        .map_err(|err| AppError::from_service(err, "failed to update post"))?;

    Ok(Json(post))
}

pub async fn delete_post(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = PostService::new(state.db.clone());
    service
        .delete_post(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete post"))?;

    tracing::info!(post_id = %id, author_id = %auth.user_id, "post deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

pub async fn create_comment(
    Path(post_id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let body = payload.body.trim();
    if body.is_empty() {
        return Err(AppError::bad_request("comment body is required"));
    }
    if body.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request(
            "comment body cannot exceed 1000 characters",
        ));
    }

    let service = CommentService::new(state.db.clone());
    let comment = service
        .create_comment(post_id, auth.user_id, body.to_string())
        .await
        .map_err(|err| AppError::from_service(err, "failed to create comment"))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    Path(post_id): Path<Uuid>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    let service = CommentService::new(state.db.clone());
    let page = service
        .list_comments(post_id, &params)
        .await
        .map_err(|err| AppError::from_service(err, "failed to list comments"))?;

    Ok(ListResponse::new(page))
}

pub async fn delete_comment(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = CommentService::new(state.db.clone());
    service
        .delete_comment(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete comment"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_post(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<LikeTransition>), AppError> {
    like(&state, TargetType::Post, id, auth.user_id).await
}

pub async fn unlike_post(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<LikeTransition>, AppError> {
    unlike(&state, TargetType::Post, id, auth.user_id).await
}

pub async fn list_post_likers(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    likers(&state, TargetType::Post, id, &params).await
}

pub async fn like_comment(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<LikeTransition>), AppError> {
    like(&state, TargetType::Comment, id, auth.user_id).await
}

pub async fn unlike_comment(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<LikeTransition>, AppError> {
    unlike(&state, TargetType::Comment, id, auth.user_id).await
}

pub async fn list_comment_likers(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    likers(&state, TargetType::Comment, id, &params).await
}

async fn like(
    state: &AppState,
    target_type: TargetType,
    target_id: Uuid,
    user_id: Uuid,
) -> Result<(StatusCode, Json<LikeTransition>), AppError> {
    let service = LikeService::new(state.db.clone());
    let transition = service
        .like_target(target_type, target_id, user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to like target"))?;

    tracing::debug!(
        target_type = target_type.as_db(),
        target_id = %target_id,
        user_id = %user_id,
        likes_count = transition.likes_count,
        "target liked"
    );

    Ok((StatusCode::CREATED, Json(transition)))
}

async fn unlike(
    state: &AppState,
    target_type: TargetType,
    target_id: Uuid,
    user_id: Uuid,
) -> Result<Json<LikeTransition>, AppError> {
    let service = LikeService::new(state.db.clone());
    let transition = service
        .unlike_target(target_type, target_id, user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to unlike target"))?;

    tracing::debug!(
        target_type = target_type.as_db(),
        target_id = %target_id,
        user_id = %user_id,
        likes_count = transition.likes_count,
        "target unliked"
    );

    Ok(Json(transition))
}

async fn likers(
    state: &AppState,
    target_type: TargetType,
    target_id: Uuid,
    params: &ListParams,
) -> Result<Json<ListResponse<serde_json::Value>>, AppError> {
    let service = LikeService::new(state.db.clone());
    let page = service
        .get_likers(target_type, target_id, params)
        .await
        .map_err(|err| AppError::from_service(err, "failed to list likers"))?;

    Ok(ListResponse::new(page))
}
