mod common;

use agora::services::seed::ensure_default_categories;

#[tokio::test]
async fn test_default_categories_are_seeded_once() {
    let app = common::spawn_app().await;

    let created = ensure_default_categories(&app.db).await.unwrap();
    assert_eq!(created, 6);

    let again = ensure_default_categories(&app.db).await.unwrap();
    assert_eq!(again, 0);

    let body = common::get_json(&app, "/categories").await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 6);
    assert_eq!(names[0], "General Discussion");
    assert_eq!(names[5], "Off-Topic");
    assert_eq!(body["data"][2]["icon"], "code");
    assert_eq!(body["data"][0]["thread_count"], 0);
}

#[tokio::test]
async fn test_seeding_keeps_existing_categories() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "seeder").await;

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "name": "Programming",
            "description": "Hand made",
            "sort_order": 99
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let created = ensure_default_categories(&app.db).await.unwrap();
    assert_eq!(created, 5);

    let body = common::get_json(&app, "/categories").await;
    let programming = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Programming")
        .unwrap();
    assert_eq!(programming["description"], "Hand made");
    assert_eq!(programming["sort_order"], 99);
}
