//! Queue scenarios end to end over SQLite and the HTTP router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use waitline_api_http::{router, AppState, StaticKeyGate};
use waitline_core::application::{JoinRequest, QueueService};
use waitline_core::domain::line::is_contiguous;
use waitline_core::domain::{DomainError, PriorityClass};
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_core::AppError;
use waitline_infra_sqlite::{create_pool, run_migrations, SqliteEntryRepository};

const API_KEY: &str = "123asd";

async fn sqlite_service(url: &str) -> Arc<QueueService> {
    let pool = create_pool(url).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let repo = Arc::new(SqliteEntryRepository::new(pool));
    Arc::new(QueueService::new(
        repo.clone(),
        repo,
        Arc::new(SystemTimeProvider),
    ))
}

async fn app() -> Router {
    let service = sqlite_service("sqlite::memory:").await;
    router(AppState::new(service, Arc::new(StaticKeyGate::new(API_KEY))))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", API_KEY);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_advance_serves_front_and_lists_rest() {
    let app = app().await;

    let (status, alice) = call(
        &app,
        "POST",
        "/queue",
        Some(json!({"name": "Alice", "class_code": "P"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alice["data"]["id"], 1);
    assert_eq!(alice["data"]["position"], 1);

    let (_, bob) = call(
        &app,
        "POST",
        "/queue",
        Some(json!({"name": "Bob", "classCode": "P"})),
    )
    .await;
    assert_eq!(bob["data"]["id"], 2);
    assert_eq!(bob["data"]["position"], 2);

    let (status, _) = call(&app, "PUT", "/queue/P", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, served) = call(&app, "GET", "/queue/1", None).await;
    assert_eq!(served["served"], true);
    assert_eq!(served["position"], 0);

    let (status, list) = call(&app, "GET", "/queue", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Bob");
    assert_eq!(list[0]["position"], 1);
}

#[tokio::test]
async fn test_rejections() {
    let app = app().await;

    let (status, _) = call(
        &app,
        "POST",
        "/queue",
        Some(json!({"name": "Alice", "class_code": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/queue", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    call(
        &app,
        "POST",
        "/queue",
        Some(json!({"name": "Alice", "class_code": "P"})),
    )
    .await;

    let (status, _) = call(&app, "PUT", "/queue/N", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    call(&app, "PUT", "/queue/P", None).await;
    let (status, _) = call(&app, "DELETE", "/queue/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_join_then_remove_then_lookup() {
    let app = app().await;

    call(
        &app,
        "POST",
        "/queue",
        Some(json!({"name": "Alice", "class_code": "N"})),
    )
    .await;

    let (status, _) = call(&app, "DELETE", "/queue/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "GET", "/queue/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_credentials_checked_on_queue_routes() {
    let app = app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/queue")
        .header("Authorization", "wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_classes_are_independent() {
    let service = sqlite_service("sqlite::memory:").await;

    for name in ["P1", "P2", "P3"] {
        service.join(JoinRequest::new(name, "P")).await.unwrap();
    }
    for name in ["N1", "N2"] {
        service.join(JoinRequest::new(name, "N")).await.unwrap();
    }

    service.advance("P").await.unwrap();

    let active = service.list_active().await.unwrap();
    let normal: Vec<_> = active
        .iter()
        .filter(|e| e.class == PriorityClass::Normal)
        .map(|e| (e.name.as_str(), e.position))
        .collect();
    assert_eq!(normal, vec![("N1", 1), ("N2", 2)]);
    assert!(is_contiguous(&active, PriorityClass::Preferential));
    assert!(is_contiguous(&active, PriorityClass::Normal));
}

#[tokio::test]
async fn test_remove_shifts_whole_class() {
    let service = sqlite_service("sqlite::memory:").await;

    for name in ["A", "B", "C"] {
        service.join(JoinRequest::new(name, "N")).await.unwrap();
    }

    let outcome = service.remove(3).await.unwrap();
    assert_eq!(outcome.removed.name, "C");
    assert_eq!(outcome.shift.served, vec![1]);

    let a = service.get(1).await.unwrap();
    let b = service.get(2).await.unwrap();
    assert!(a.served);
    assert_eq!(a.position, 0);
    assert_eq!(b.position, 1);
}

#[tokio::test]
async fn test_served_ids_are_not_reused() {
    let service = sqlite_service("sqlite::memory:").await;

    service.join(JoinRequest::new("Alice", "P")).await.unwrap();
    service.advance("P").await.unwrap();

    let bob = service.join(JoinRequest::new("Bob", "P")).await.unwrap();
    assert_eq!(bob.id, 2);
    assert_eq!(bob.position, 1);

    let err = service.remove(1).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::AlreadyServed(1))
    ));
}

#[tokio::test]
async fn test_removed_newest_id_is_not_recycled() {
    let service = sqlite_service("sqlite::memory:").await;

    service.join(JoinRequest::new("Alice", "N")).await.unwrap();
    service.join(JoinRequest::new("Bob", "N")).await.unwrap();
    service.remove(2).await.unwrap();

    let carol = service.join(JoinRequest::new("Carol", "N")).await.unwrap();
    assert_eq!(carol.id, 3);
    assert_eq!(carol.position, 1);
}

#[tokio::test]
async fn test_concurrent_joins_stay_contiguous() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("concurrent.db").display());
    let service = sqlite_service(&url).await;

    let mut handles = Vec::new();
    for i in 0..40 {
        let service = service.clone();
        let class = if i % 2 == 0 { "P" } else { "N" };
        handles.push(tokio::spawn(async move {
            service
                .join(JoinRequest::new(format!("person{}", i), class))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let active = service.list_active().await.unwrap();
    assert_eq!(active.len(), 40);
    assert!(is_contiguous(&active, PriorityClass::Preferential));
    assert!(is_contiguous(&active, PriorityClass::Normal));

    let mut ids: Vec<_> = active.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=40).collect::<Vec<_>>());
}
