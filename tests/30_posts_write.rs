mod common;

use anyhow::Result;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

const TITLE: &str = "New Test of New Title";
const BODY: &str = "This is a new test of the body of the post (thanks Chris)";

#[tokio::test]
async fn create_with_form_params() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;

    let res = server
        .client
        .post(server.url("/posts"))
        .header(AUTHORIZATION, common::bearer(user.id))
        .form(&[("title", TITLE), ("body", BODY)])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let post = res.json::<Value>().await?;
    assert!(post["title"].as_str().unwrap_or_default().contains("Test"));
    assert_eq!(post["body"], BODY);
    assert_eq!(post["user_id"], user.id);
    Ok(())
}

#[tokio::test]
async fn create_then_show_round_trips() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;

    let created = server
        .client
        .post(server.url("/posts"))
        .header(AUTHORIZATION, common::bearer(user.id))
        .json(&json!({ "title": "Punctuation: \"quotes\", & ampersands?!", "body": "line one\nline two" }))
        .send()
        .await?
        .json::<Value>()
        .await?;

    let shown = server
        .client
        .get(server.url(&format!("/posts/{}", created["id"])))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(shown["title"], "Punctuation: \"quotes\", & ampersands?!");
    assert_eq!(shown["body"], "line one\nline two");
    Ok(())
}

#[tokio::test]
async fn create_without_title_is_unprocessable() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;

    let res = server
        .client
        .post(server.url("/posts"))
        .header(AUTHORIZATION, common::bearer(user.id))
        .json(&json!({ "body": BODY }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert_eq!(body["field_errors"]["title"], "is required");
    assert!(server.state.store.list_posts().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_changes_only_given_fields() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;

    server
        .client
        .post(server.url("/posts"))
        .header(AUTHORIZATION, common::bearer(user.id))
        .form(&[("title", TITLE), ("body", BODY)])
        .send()
        .await?
        .error_for_status()?;

    let post = server.state.store.find_post_by_title(TITLE).await?;

    let res = server
        .client
        .patch(server.url(&format!("/posts/{}", post.id)))
        .header(AUTHORIZATION, common::bearer(user.id))
        .form(&[("title", "Test Title")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let updated = res.json::<Value>().await?;
    assert_eq!(updated["title"], "Test Title");
    assert_eq!(updated["body"], BODY);

    let stored = server.state.store.find_post(post.id).await?;
    assert_eq!(stored.title, "Test Title");
    assert_eq!(stored.body, BODY);
    Ok(())
}

#[tokio::test]
async fn update_without_body_leaves_post_unchanged() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;
    let post = server.create_post(user.id, TITLE, BODY).await?;

    let res = server
        .client
        .patch(server.url(&format!("/posts/{}", post.id)))
        .header(AUTHORIZATION, common::bearer(user.id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let shown = res.json::<Value>().await?;
    assert_eq!(shown["id"], post.id);
    assert_eq!(shown["title"], TITLE);
    assert_eq!(shown["body"], BODY);

    let stored = server.state.store.find_post(post.id).await?;
    assert_eq!(stored.title, TITLE);
    assert_eq!(stored.body, BODY);
    Ok(())
}

#[tokio::test]
async fn create_without_body_is_unprocessable() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;

    let res = server
        .client
        .post(server.url("/posts"))
        .header(AUTHORIZATION, common::bearer(user.id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert_eq!(body["field_errors"]["title"], "is required");
    assert_eq!(body["field_errors"]["body"], "is required");
    Ok(())
}

#[tokio::test]
async fn any_authenticated_user_may_update() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let owner = server.create_user("Owner", "owner@test.com").await?;
    let other = server.create_user("Other", "other@test.com").await?;
    let post = server.create_post(owner.id, TITLE, BODY).await?;

    let res = server
        .client
        .put(server.url(&format!("/posts/{}", post.id)))
        .header(AUTHORIZATION, common::bearer(other.id))
        .json(&json!({ "body": "rewritten" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let updated = res.json::<Value>().await?;
    assert_eq!(updated["title"], TITLE);
    assert_eq!(updated["body"], "rewritten");
    assert_eq!(updated["user_id"], owner.id);
    Ok(())
}

#[tokio::test]
async fn update_missing_post_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;

    let res = server
        .client
        .patch(server.url("/posts/12345"))
        .header(AUTHORIZATION, common::bearer(user.id))
        .json(&json!({ "title": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn destroy_removes_post_and_is_not_idempotent() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("Test", "test@test.com").await?;
    let keep = server.create_post(user.id, "keep", "kept").await?;
    let post = server.create_post(user.id, TITLE, BODY).await?;
    let url = server.url(&format!("/posts/{}", post.id));

    let res = server
        .client
        .delete(&url)
        .header(AUTHORIZATION, common::bearer(user.id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["message"].as_str().unwrap_or_default().contains("destroyed"));

    let res = server.client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let posts = server
        .client
        .get(server.url("/posts"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], keep.id);

    let res = server
        .client
        .delete(&url)
        .header(AUTHORIZATION, common::bearer(user.id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
