use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server::{load_index, router, AppState};
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

const CORPUS: &str = r#"<feed>
<doc><title>Wikipedia: Rust (programming language)</title><url>https://en.wikipedia.org/wiki/Rust_(programming_language)</url><abstract>Rust is great. rust systems programming. Rust is fast.</abstract></doc>
<doc><title>Wikipedia: Learning</title><url>https://en.wikipedia.org/wiki/Learning</url><abstract>Learning rust.</abstract></doc>
<doc><title>Wikipedia: Python</title><url>https://en.wikipedia.org/wiki/Python</url><abstract>Python is a programming language.</abstract></doc>
</feed>"#;

fn tiny_app(admin_token: Option<&str>) -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("abstracts.xml");
    fs::write(&path, CORPUS).unwrap();
    let index = load_index(&path, None).unwrap();
    router(AppState { index, admin_token: admin_token.map(String::from) })
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn batch(token: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::post("/index/batch").header("content-type", "application/json");
    if let Some(token) = token {
        req = req.header("X-ADMIN-TOKEN", token);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let app = tiny_app(None);
    let (status, json) = get(app, "/search?q=rust&k=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"].as_u64().unwrap(), 1);
    assert_eq!(arr[1]["doc_id"].as_u64().unwrap(), 2);
    assert!(arr[0]["score"].as_f64().unwrap() > arr[1]["score"].as_f64().unwrap());
    assert!(arr[0]["snippet"].as_str().unwrap().contains("<em>rust</em>"));
}

#[tokio::test]
async fn search_applies_limit_and_strict_mode() {
    let app = tiny_app(None);
    let (_, json) = get(app.clone(), "/search?q=programming&k=1").await;
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);

    let (_, json) = get(app.clone(), "/search?q=rust%20unicorn").await;
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    let (_, json) = get(app, "/search?q=rust%20unicorn&strict=true").await;
    assert_eq!(json["total_hits"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn stop_word_query_is_empty() {
    let app = tiny_app(None);
    let (status, json) = get(app, "/search?q=the%20of%20and").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn doc_lookup() {
    let app = tiny_app(None);
    let (status, json) = get(app.clone(), "/doc/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Wikipedia: Python");
    let (status, _) = get(app, "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_requires_admin_token() {
    let body = r#"[{"title":"Go","url":"https://go.dev","abstract":"Go is a language"}]"#;
    let (status, _) = send(tiny_app(None), batch(Some("secret"), body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(tiny_app(Some("secret")), batch(Some("wrong"), body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn batch_indexes_documents_atomically() {
    let app = tiny_app(Some("secret"));

    let invalid = r#"[{"title":"Go","url":"https://go.dev","abstract":"gopher"},{"title":"No url","abstract":"gopher"}]"#;
    let (status, _) = send(app.clone(), batch(Some("secret"), invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, json) = get(app.clone(), "/search?q=gopher").await;
    assert_eq!(json["total_hits"].as_u64().unwrap(), 0);

    let valid = r#"[{"title":"Go","url":"https://go.dev","abstract":"gopher"},{"title":"Gophers","url":"https://x","abstract":"gopher gopher"}]"#;
    let (status, json) = send(app.clone(), batch(Some("secret"), valid)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ids"], serde_json::json!([4, 5]));

    let (_, json) = get(app.clone(), "/search?q=gopher").await;
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    let (_, json) = get(app, "/stats").await;
    assert_eq!(json["num_docs"].as_u64().unwrap(), 5);
}
