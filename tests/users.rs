mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn directory_search_matches_either_name() {
    let Some(app) = common::app().await else {
        return;
    };
    let family = format!("Fam{}", Uuid::new_v4().simple());
    let annabel = app.create_user("Annabel", &family).await;
    let joanna = app.create_user("Joanna", &family).await;
    app.create_user("Bob", &family).await;
    let blocked = app.create_user("Hannah", &family).await;
    sqlx::query("UPDATE users SET is_active = 'BLOCKED' WHERE id = $1")
        .bind(blocked)
        .execute(app.pool())
        .await
        .unwrap();

    let res = app
        .get(
            &format!("/api/v1/users?lastName={}&searchTerm=ann&sort=firstName", family),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    let ids: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![annabel.to_string(), joanna.to_string()]);
    assert_eq!(body["meta"]["total"], 2);

    for user in body["items"].as_array().unwrap() {
        assert!(user.get("email").is_none());
    }
}

#[tokio::test]
async fn directory_cannot_be_widened_to_inactive_users() {
    let Some(app) = common::app().await else {
        return;
    };
    let family = format!("Fam{}", Uuid::new_v4().simple());
    let blocked = app.create_user("Blocked", &family).await;
    sqlx::query("UPDATE users SET is_active = 'BLOCKED' WHERE id = $1")
        .bind(blocked)
        .execute(app.pool())
        .await
        .unwrap();

    let res = app
        .get(
            &format!("/api/v1/users?lastName={}&isActive=BLOCKED", family),
            None,
        )
        .await;
    assert_eq!(res.json()["meta"]["total"], 0);

    // A blocked account cannot act either.
    let res = app.get("/api/v1/users/me", Some(blocked)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profiles_hide_email_from_others() {
    let Some(app) = common::app().await else {
        return;
    };
    let user = app.create_user("Pro", "File").await;

    let res = app.get("/api/v1/users/me", Some(user)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.json()["email"].as_str().unwrap().ends_with("@example.com"));

    let res = app.get(&format!("/api/v1/users/{}", user), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["firstName"], "Pro");
    assert!(res.json().get("email").is_none());

    let res = app
        .get(&format!("/api/v1/users/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/v1/users/me", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_me_changes_only_given_fields() {
    let Some(app) = common::app().await else {
        return;
    };
    let user = app.create_user("Old", "Name").await;

    let res = app
        .patch_json(
            "/api/v1/users/me",
            json!({ "firstName": "  New ", "bio": "hello" }),
            Some(user),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["firstName"], "New");
    assert_eq!(body["lastName"], "Name");
    assert_eq!(body["bio"], "hello");

    let res = app
        .patch_json("/api/v1/users/me", json!({ "lastName": "" }), Some(user))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_message(), "lastName is required");
}
