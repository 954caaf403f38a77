use std::sync::Arc;

use kookpal::server::{router, AppState};
use kookpal::SpoonacularClient;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::Value;
use tokio::net::TcpListener;

/// Start the relay on an ephemeral port in front of `upstream`
async fn spawn_relay(upstream: &ServerGuard, api_key: Option<&str>) -> String {
    let client = SpoonacularClient::with_base_url(api_key.map(str::to_string), upstream.url());
    let app = router(AppState::new(Arc::new(client)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}")
}

async fn get_json(url: &str) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    let body = response.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn test_search_relays_upstream_body() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test_key".into()),
            Matcher::UrlEncoded("ingredients".into(), "tomato,cheese".into()),
            Matcher::UrlEncoded("number".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 101, "title": "Caprese", "usedIngredientCount": 2},
                {"id": 102, "title": "Pizza", "usedIngredientCount": 2}
            ]"#,
        )
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, body) = get_json(&format!("{relay}/api/recipes?ingredients=tomato,cheese")).await;

    assert_eq!(status, 200);
    assert_eq!(body[0]["title"], "Caprese");
    assert_eq!(body[1]["usedIngredientCount"], 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_recipe_detail_relays_upstream_body() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", "/recipes/716429/information")
        .match_query(Matcher::UrlEncoded("apiKey".into(), "test_key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 716429, "title": "Pasta", "servings": 2, "extendedIngredients": []}"#)
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, body) = get_json(&format!("{relay}/api/recipe/716429")).await;

    assert_eq!(status, 200);
    assert_eq!(body["servings"], 2);
    assert!(body["extendedIngredients"].as_array().unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_api_key_fails_every_route_before_upstream() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, None).await;

    for path in [
        "/api/recipes?ingredients=rice",
        "/api/recipe/1",
        "/api/recipe/abc",
    ] {
        let (status, body) = get_json(&format!("{relay}{path}")).await;
        assert_eq!(status, 500, "{path}");
        assert_eq!(body["error"], "API key not configured");
        assert_eq!(
            body["message"],
            "Please make sure you have set up your Spoonacular API key"
        );
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_unauthorized_becomes_invalid_key() {
    let mut upstream = Server::new_async().await;
    let _mock = upstream
        .mock("GET", Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "failure", "code": 401, "message": "You are not authorized."}"#)
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("wrong_key")).await;

    for path in ["/api/recipes?ingredients=rice", "/api/recipe/9"] {
        let (status, body) = get_json(&format!("{relay}{path}")).await;
        assert_eq!(status, 401, "{path}");
        assert_eq!(body["error"], "Invalid API key");
        assert_eq!(body["message"], "Please check your Spoonacular API key");
    }
}

#[tokio::test]
async fn test_other_upstream_failures_become_500() {
    let mut upstream = Server::new_async().await;
    let _mock = upstream
        .mock("GET", Matcher::Any)
        .with_status(402)
        .with_body("daily quota used up")
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;

    let (status, body) = get_json(&format!("{relay}/api/recipes?ingredients=rice")).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "API Error: 402");
    assert_eq!(body["message"], "Failed to fetch recipes");

    let (status, body) = get_json(&format!("{relay}/api/recipe/5")).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "API Error: 402");
    assert_eq!(body["message"], "Failed to fetch recipe details");
}

#[tokio::test]
async fn test_unparseable_upstream_body_becomes_500() {
    let mut upstream = Server::new_async().await;
    let _mock = upstream
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, body) = get_json(&format!("{relay}/api/recipes?ingredients=rice")).await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], "Failed to fetch recipes");
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_ingredients_forwarded_as_empty_list() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::UrlEncoded("ingredients".into(), "".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, body) = get_json(&format!("{relay}/api/recipes")).await;

    assert_eq!(status, 200);
    assert_eq!(body, Value::Array(vec![]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_numeric_id_is_forwarded_upstream() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", "/recipes/abc/information")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status": "failure", "code": 404}"#)
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, body) = get_json(&format!("{relay}/api/recipe/abc")).await;

    assert_eq!(status, 500);
    assert_eq!(
        body,
        serde_json::json!({
            "error": "API Error: 404",
            "message": "Failed to fetch recipe details",
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreadable_id_becomes_json_500() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, body) = get_json(&format!("{relay}/api/recipe/%FF")).await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], "Failed to fetch recipe details");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request: "));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_repeated_ingredients_key_is_joined() {
    let mut upstream = Server::new_async().await;
    let mock = upstream
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::UrlEncoded("ingredients".into(), "a,b".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let (status, _) = get_json(&format!("{relay}/api/recipes?ingredients=a&ingredients=b")).await;

    assert_eq!(status, 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let mut upstream = Server::new_async().await;
    let _mock = upstream
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let relay = spawn_relay(&upstream, Some("test_key")).await;
    let response = reqwest::Client::new()
        .get(format!("{relay}/api/recipes?ingredients=rice"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
