mod common;

use agora::models::post;
use sea_orm::{ActiveModelTrait, TransactionTrait};
use serde_json::Value;

fn ids(nodes: &Value) -> Vec<i64> {
    nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_replies_nest_under_parents_in_creation_order() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "tree").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Tree").await;

    let p1 = common::create_post(&app, &token, thread_id, None, "root").await;
    let p2 = common::create_post(&app, &token, thread_id, Some(p1), "first reply").await;
    let p3 = common::create_post(&app, &token, thread_id, Some(p1), "second reply").await;
    let p4 = common::create_post(&app, &token, thread_id, Some(p2), "nested").await;
    let p5 = common::create_post(&app, &token, thread_id, None, "another root").await;

    let body = common::get_json(&app, &format!("/threads/{}/posts", thread_id)).await;
    let tree = &body["data"];

    assert_eq!(ids(tree), vec![p1 as i64, p5 as i64]);
    assert_eq!(ids(&tree[0]["replies"]), vec![p2 as i64, p3 as i64]);
    assert_eq!(ids(&tree[0]["replies"][0]["replies"]), vec![p4 as i64]);
    assert!(tree[0]["replies"][1]["replies"].as_array().unwrap().is_empty());
    assert!(tree[1]["replies"].as_array().unwrap().is_empty());
    assert_eq!(tree[0]["replies"][0]["replies"][0]["content"], "nested");
}

#[tokio::test]
async fn test_votes_do_not_reorder_replies() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "order").await;
    let (_, fan_token) = common::create_test_user(&app, "fan").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Order").await;

    let early = common::create_post(&app, &token, thread_id, None, "early").await;
    let late = common::create_post(&app, &token, thread_id, None, "late").await;
    common::vote(&app, &fan_token, late, 1).await;
    common::vote(&app, &fan_token, early, -1).await;

    let body = common::get_json(&app, &format!("/threads/{}/posts", thread_id)).await;
    assert_eq!(ids(&body["data"]), vec![early as i64, late as i64]);
    assert_eq!(body["data"][1]["net_votes"], 1);
    assert_eq!(body["data"][0]["net_votes"], -1);
}

#[tokio::test]
async fn test_viewer_vote_annotation() {
    let app = common::spawn_app().await;
    let (author_id, token) = common::create_test_user(&app, "writer").await;
    let (_, reader_token) = common::create_test_user(&app, "reader").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Annotated").await;

    let voted = common::create_post(&app, &token, thread_id, None, "voted").await;
    common::create_post(&app, &token, thread_id, Some(voted), "not voted").await;
    common::vote(&app, &reader_token, voted, -1).await;

    let path = format!("/threads/{}/posts", thread_id);

    // Anonymous callers see no votes.
    let anon = common::get_json(&app, &path).await;
    assert!(anon["data"][0]["user_vote"].is_null());

    let mine: Value = app
        .client
        .get(app.url(&path))
        .bearer_auth(&reader_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let root = &mine["data"][0];
    assert_eq!(root["user_vote"], -1);
    assert!(root["replies"][0]["user_vote"].is_null());
    assert_eq!(root["author"]["id"], author_id);
    assert_eq!(root["author"]["reputation"], -1);
    assert!(root["author"].get("password_hash").is_none());

    // The author has not voted on their own post.
    let authors_view: Value = app
        .client
        .get(app.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(authors_view["data"][0]["user_vote"].is_null());
}

#[tokio::test]
async fn test_invalid_token_reads_anonymously() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "tokenless").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Open").await;
    common::create_post(&app, &token, thread_id, None, "hello").await;

    let resp = app
        .client
        .get(app.url(&format!("/threads/{}/posts", thread_id)))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"][0]["user_vote"].is_null());
}

#[tokio::test]
async fn test_empty_and_missing_threads() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "empty").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Silent").await;

    let body = common::get_json(&app, &format!("/threads/{}/posts", thread_id)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let resp = app
        .client
        .get(app.url("/threads/8080/posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_deep_reply_chain_is_served() {
    const DEPTH: usize = 3_000;

    let app = common::spawn_app().await;
    let (user_id, token) = common::create_test_user(&app, "chain").await;
    let category_id = common::create_category(&app, &token).await;
    let thread_id = common::create_thread(&app, &token, category_id, "Chain").await;

    let txn = app.db.begin().await.unwrap();
    let now = chrono::Utc::now().naive_utc();
    let mut parent = None;
    for i in 0..DEPTH {
        let inserted = post::ActiveModel {
            thread_id: sea_orm::ActiveValue::Set(thread_id),
            author_id: sea_orm::ActiveValue::Set(user_id),
            content: sea_orm::ActiveValue::Set(format!("link {i}")),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            parent_post_id: sea_orm::ActiveValue::Set(parent),
            upvotes: sea_orm::ActiveValue::Set(0),
            downvotes: sea_orm::ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .unwrap();
        parent = Some(inserted.id);
    }
    txn.commit().await.unwrap();

    let resp = app
        .client
        .get(app.url(&format!("/threads/{}/posts", thread_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert_eq!(body.matches("\"replies\":").count(), DEPTH);
    assert!(body.contains(&format!("\"link {}\"", DEPTH - 1)));

    // The server keeps answering afterwards.
    let stats = common::get_json(&app, "/stats").await;
    assert_eq!(stats["success"], true);
}
