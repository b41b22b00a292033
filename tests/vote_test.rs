mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::Value;

/// Author, voter, and a single post by the author. Returns (app, author_id, voter_token, post_id).
async fn setup() -> (common::TestApp, i32, String, i32) {
    let app = common::spawn_app().await;
    let (author_id, author_token) = common::create_test_user(&app, "author").await;
    let (_, voter_token) = common::create_test_user(&app, "voter").await;
    let category_id = common::create_category(&app, &author_token).await;
    let thread_id = common::create_thread(&app, &author_token, category_id, "Votes").await;
    let post_id = common::create_post(&app, &author_token, thread_id, None, "Vote on me").await;
    (app, author_id, voter_token, post_id)
}

async fn reputation(app: &common::TestApp, user_id: i32) -> i64 {
    let body = common::get_json(app, &format!("/users/{}", user_id)).await;
    body["data"]["user"]["reputation"].as_i64().unwrap()
}

async fn vote_rows(app: &common::TestApp, post_id: i32) -> u64 {
    agora::models::Vote::find()
        .filter(agora::models::vote::Column::PostId.eq(post_id))
        .count(&app.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_first_upvote_counts_once() {
    let (app, author_id, voter_token, post_id) = setup().await;

    let resp = common::vote(&app, &voter_token, post_id, 1).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["change"], "created");
    assert_eq!(body["data"]["upvotes"], 1);
    assert_eq!(body["data"]["downvotes"], 0);
    assert_eq!(body["data"]["net_votes"], 1);
    assert_eq!(body["data"]["author_reputation"], 1);

    assert_eq!(reputation(&app, author_id).await, 1);
    assert_eq!(vote_rows(&app, post_id).await, 1);
}

#[tokio::test]
async fn test_repeated_vote_is_idempotent() {
    let (app, author_id, voter_token, post_id) = setup().await;

    common::vote(&app, &voter_token, post_id, -1).await;
    let resp = common::vote(&app, &voter_token, post_id, -1).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["change"], "unchanged");
    assert_eq!(body["data"]["upvotes"], 0);
    assert_eq!(body["data"]["downvotes"], 1);

    assert_eq!(reputation(&app, author_id).await, -1);
    assert_eq!(vote_rows(&app, post_id).await, 1);
}

#[tokio::test]
async fn test_flip_moves_each_counter_by_one() {
    let (app, author_id, voter_token, post_id) = setup().await;

    common::vote(&app, &voter_token, post_id, 1).await;
    let body: Value = common::vote(&app, &voter_token, post_id, -1)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["change"], "flipped");
    assert_eq!(body["data"]["upvotes"], 0);
    assert_eq!(body["data"]["downvotes"], 1);
    assert_eq!(reputation(&app, author_id).await, -1);

    let body: Value = common::vote(&app, &voter_token, post_id, 1)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["upvotes"], 1);
    assert_eq!(body["data"]["downvotes"], 0);
    assert_eq!(reputation(&app, author_id).await, 1);
    assert_eq!(vote_rows(&app, post_id).await, 1);
}

#[tokio::test]
async fn test_votes_from_different_users_add_up() {
    let (app, author_id, voter_token, post_id) = setup().await;
    let (_, other_token) = common::create_test_user(&app, "other").await;
    let (_, third_token) = common::create_test_user(&app, "third").await;

    common::vote(&app, &voter_token, post_id, 1).await;
    common::vote(&app, &other_token, post_id, 1).await;
    let body: Value = common::vote(&app, &third_token, post_id, -1)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["upvotes"], 2);
    assert_eq!(body["data"]["downvotes"], 1);
    assert_eq!(body["data"]["net_votes"], 1);
    assert_eq!(reputation(&app, author_id).await, 1);
    assert_eq!(vote_rows(&app, post_id).await, 3);
}

#[tokio::test]
async fn test_self_vote_is_allowed() {
    let app = common::spawn_app().await;
    let (user_id, token) = common::create_test_user(&app, "selfvoter").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Mine").await;
    let post_id = common::create_post(&app, &token, thread_id, None, "Mine").await;

    let resp = common::vote(&app, &token, post_id, 1).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(reputation(&app, user_id).await, 1);
}

#[tokio::test]
async fn test_vote_on_missing_post_writes_nothing() {
    let (app, _, voter_token, _) = setup().await;

    let resp = common::vote(&app, &voter_token, 999_999, 1).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(vote_rows(&app, 999_999).await, 0);
}

#[tokio::test]
async fn test_vote_value_must_be_plus_or_minus_one() {
    let (app, author_id, voter_token, post_id) = setup().await;

    for value in [0, 2, -5] {
        let resp = common::vote(&app, &voter_token, post_id, value).await;
        assert_eq!(resp.status(), 400, "value {value} accepted");
    }
    assert_eq!(vote_rows(&app, post_id).await, 0);
    assert_eq!(reputation(&app, author_id).await, 0);
}

#[tokio::test]
async fn test_vote_requires_auth() {
    let (app, _, _, post_id) = setup().await;

    let resp = app
        .client
        .post(app.url("/votes"))
        .json(&serde_json::json!({ "post_id": post_id, "value": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(vote_rows(&app, post_id).await, 0);
}

#[tokio::test]
async fn test_camel_case_payload_is_accepted() {
    let (app, _, voter_token, post_id) = setup().await;

    let resp = app
        .client
        .post(app.url("/votes"))
        .bearer_auth(&voter_token)
        .json(&serde_json::json!({ "postId": post_id, "value": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_concurrent_voters_are_all_counted() {
    let (app, author_id, _, post_id) = setup().await;

    let mut tokens = Vec::new();
    for _ in 0..8 {
        tokens.push(common::create_test_user(&app, "crowd").await.1);
    }

    let mut handles = Vec::new();
    for (i, token) in tokens.into_iter().enumerate() {
        let client = app.client.clone();
        let url = app.url("/votes");
        let value = if i % 4 == 0 { -1 } else { 1 };
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(token)
                .json(&serde_json::json!({ "post_id": post_id, "value": value }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let post = agora::models::Post::find_by_id(post_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post.upvotes, 6);
    assert_eq!(post.downvotes, 2);
    assert_eq!(reputation(&app, author_id).await, 4);
    assert_eq!(vote_rows(&app, post_id).await, 8);
}

#[tokio::test]
async fn test_concurrent_flips_by_one_user_stay_consistent() {
    let (app, author_id, voter_token, post_id) = setup().await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = app.client.clone();
        let url = app.url("/votes");
        let token = voter_token.clone();
        let value = if i % 2 == 0 { 1 } else { -1 };
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(token)
                .json(&serde_json::json!({ "post_id": post_id, "value": value }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    assert_eq!(vote_rows(&app, post_id).await, 1);
    let stored = agora::models::Vote::find()
        .filter(agora::models::vote::Column::PostId.eq(post_id))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    let post = agora::models::Post::find_by_id(post_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(post.upvotes + post.downvotes, 1);
    assert_eq!(post.net_votes(), i32::from(stored.value));
    assert_eq!(reputation(&app, author_id).await, i64::from(stored.value));
}
