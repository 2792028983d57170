use axum::{routing::delete, routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn users() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route(
            "/users/me",
            get(handlers::get_me).patch(handlers::update_me),
        )
        .route("/users/:id", get(handlers::get_user))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::create_post))
        .route("/posts/feed", get(handlers::feed))
        .route("/posts/user/:user_id", get(handlers::user_timeline))
        .route(
            "/posts/:id",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
}

pub fn comments() -> Router<AppState> {
    Router::new()
        .route(
            "/posts/:id/comments",
            post(handlers::create_comment).get(handlers::list_comments),
        )
        .route("/comments/:id", delete(handlers::delete_comment))
}

pub fn likes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts/:id/like",
            post(handlers::like_post).delete(handlers::unlike_post),
        )
        .route("/posts/:id/likes", get(handlers::list_post_likers))
        .route(
            "/comments/:id/like",
            post(handlers::like_comment).delete(handlers::unlike_comment),
        )
        .route("/comments/:id/likes", get(handlers::list_comment_likers))
}
