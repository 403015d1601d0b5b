mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_config_requires_user_id_header() {
    let app = setup_test_app();
    let client = app.client();

    let response = client.get("/api/webhook/config").await;
    assert_eq!(response.status_code(), 401);

    let response = client
        .post("/api/webhook/config")
        .json(&serde_json::json!({ "webhookUrl": "https://hook.example/a" }))
        .await;
    assert_eq!(response.status_code(), 401);

    let data: serde_json::Value = response.json();
    assert_eq!(data["code"], serde_json::json!("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_save_and_get_webhook_config() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post("/api/webhook/config")
        .add_header("X-User-Id", "user-a")
        .json(&serde_json::json!({ "webhookUrl": "https://hook.example/a" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let saved: serde_json::Value = response.json();
    assert_eq!(saved["webhookUrl"], serde_json::json!("https://hook.example/a"));
    assert_eq!(saved["userId"], serde_json::json!("user-a"));
    assert!(saved["id"].is_i64());
    assert!(saved["createdAt"].is_string());

    let response = client
        .get("/api/webhook/config")
        .add_header("X-User-Id", "user-a")
        .await;
    assert_eq!(response.status_code(), 200);

    let fetched: serde_json::Value = response.json();
    assert_eq!(fetched["webhookUrl"], serde_json::json!("https://hook.example/a"));
}

#[tokio::test]
async fn test_get_config_for_unknown_user_returns_empty_url() {
    let app = setup_test_app();
    let client = app.client();

    // User A saves a config; user B still sees none.
    client
        .post("/api/webhook/config")
        .add_header("X-User-Id", "user-a")
        .json(&serde_json::json!({ "webhookUrl": "https://hook.example/a" }))
        .await;

    let response = client
        .get("/api/webhook/config")
        .add_header("X-User-Id", "user-b")
        .await;
    assert_eq!(response.status_code(), 200);

    let data: serde_json::Value = response.json();
    assert_eq!(data, serde_json::json!({ "webhookUrl": "" }));
}

#[tokio::test]
async fn test_save_config_rejects_invalid_url() {
    let app = setup_test_app();
    let client = app.client();

    for bad in ["not a url", "hook.example/no-scheme", "ftp://hook.example"] {
        let response = client
            .post("/api/webhook/config")
            .add_header("X-User-Id", "user-a")
            .json(&serde_json::json!({ "webhookUrl": bad }))
            .await;
        assert_eq!(response.status_code(), 400, "{} should be rejected", bad);

        let data: serde_json::Value = response.json();
        assert_eq!(data["code"], serde_json::json!("VALIDATION_ERROR"));
    }
}

#[tokio::test]
async fn test_save_config_is_upsert() {
    let app = setup_test_app();
    let client = app.client();

    let first: serde_json::Value = client
        .post("/api/webhook/config")
        .add_header("X-User-Id", "user-a")
        .json(&serde_json::json!({ "webhookUrl": "https://hook.example/old" }))
        .await
        .json();

    let second: serde_json::Value = client
        .post("/api/webhook/config")
        .add_header("X-User-Id", "user-a")
        .json(&serde_json::json!({ "webhookUrl": "https://hook.example/new" }))
        .await
        .json();

    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["createdAt"], first["createdAt"]);
    assert_eq!(second["webhookUrl"], serde_json::json!("https://hook.example/new"));
}
