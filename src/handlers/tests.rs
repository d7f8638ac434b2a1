//! # Tests for Handlers
//!
//! Router-level tests against an in-memory SQLite database.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{enable_foreign_keys, run_migrations};
use crate::repositories::{CompanyInput, CompanyRepository, MachineInput, MachineRepository};
use crate::server::{AppState, create_app};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use cookie::{Cookie, SameSite};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    enable_foreign_keys(&db).await.unwrap();
    run_migrations(&db).await.unwrap();

    AppState {
        config: Arc::new(AppConfig::default()),
        db,
    }
}

fn app(state: &AppState) -> Router {
    create_app(state.clone())
}

fn inertia_get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("X-Inertia", "true")
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Inertia", "true")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &axum::response::Response) -> Cookie<'static> {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    Cookie::parse_encoded(raw).unwrap()
}

async fn seed_company(db: &DatabaseConnection, name: &str) -> i32 {
    CompanyRepository::new(db)
        .create(CompanyInput {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_root_renders_welcome_page() {
    let state = test_state().await;

    let response = app(&state).oneshot(inertia_get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["component"], "welcome");
    assert_eq!(page["url"], "/");
    assert_eq!(page["props"]["service"], "registry");
    assert_eq!(page["props"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_healthz_reports_database() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["database"], "ok");
}

#[tokio::test]
async fn test_healthz_unavailable_without_database() {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        db: DatabaseConnection::default(),
    };

    let response = app(&state)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_index_renders_company_page() {
    let state = test_state().await;
    let acme = seed_company(&state.db, "Acme").await;
    MachineRepository::new(&state.db)
        .create(MachineInput::new("Torno", acme))
        .await
        .unwrap();

    let response = app(&state).oneshot(inertia_get("/company")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-inertia").unwrap(), "true");
    assert!(response.headers().get("x-trace-id").is_some());

    let page = body_json(response).await;
    assert_eq!(page["component"], "company");
    assert_eq!(page["url"], "/company");
    assert_eq!(page["version"], "1");
    assert_eq!(page["props"]["errors"], json!({}));
    assert_eq!(page["props"]["companies"][0]["name"], "Acme");
    assert_eq!(page["props"]["companies"][0]["machines_count"], 1);
}

#[tokio::test]
async fn test_index_without_inertia_header_returns_html_shell() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(Request::builder().uri("/company").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("data-page=\""));
    assert!(html.contains("&quot;component&quot;:&quot;company&quot;"));
}

#[tokio::test]
async fn test_index_with_stale_asset_version_conflicts() {
    let state = test_state().await;

    let request = Request::builder()
        .uri("/company")
        .header("X-Inertia", "true")
        .header("X-Inertia-Version", "outdated")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response.headers().get("x-inertia-location").unwrap(),
        "/company"
    );
}

#[tokio::test]
async fn test_store_redirects_with_flash() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(json_request(
            Method::POST,
            "/company",
            json!({ "name": "  Acme  ", "description": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/company");
    let cookie = set_cookie(&response);
    assert_eq!(cookie.name(), "flash");
    assert_eq!(cookie.value(), "Empresa criada com sucesso!");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));

    let rows = CompanyRepository::new(&state.db)
        .list_with_machine_count()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Acme");
    assert_eq!(rows[0].description, None);
    assert_eq!(rows[0].machines_count, 0);
}

#[tokio::test]
async fn test_flash_is_shown_on_next_render() {
    let state = test_state().await;

    let request = Request::builder()
        .uri("/company")
        .header("X-Inertia", "true")
        .header(header::COOKIE, "flash=Empresa%20criada%20com%20sucesso!")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));

    let page = body_json(response).await;
    assert_eq!(
        page["props"]["flash"]["success"],
        "Empresa criada com sucesso!"
    );
}

#[tokio::test]
async fn test_store_with_empty_name_rerenders_with_errors() {
    let state = test_state().await;
    seed_company(&state.db, "Existing").await;

    let response = app(&state)
        .oneshot(json_request(
            Method::POST,
            "/company",
            json!({ "name": "", "description": "draft" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_json(response).await;
    assert_eq!(page["component"], "company");
    assert_eq!(
        page["props"]["errors"]["name"],
        "The name field is required."
    );
    assert_eq!(page["props"]["old"]["description"], "draft");
    assert_eq!(page["props"]["companies"].as_array().unwrap().len(), 1);

    assert_eq!(CompanyRepository::new(&state.db).count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_store_with_malformed_json_is_bad_request() {
    let state = test_state().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/company")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_show_renders_company_with_machines() {
    let state = test_state().await;
    let acme = seed_company(&state.db, "Acme").await;
    MachineRepository::new(&state.db)
        .create(MachineInput::new("Prensa", acme))
        .await
        .unwrap();

    let response = app(&state)
        .oneshot(inertia_get(&format!("/company/{}", acme)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["component"], "company/show");
    assert_eq!(page["props"]["company"]["name"], "Acme");
    assert_eq!(page["props"]["company"]["machines"][0]["name"], "Prensa");
}

#[tokio::test]
async fn test_show_unknown_company_is_not_found() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(inertia_get("/company/999"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_replaces_fields_and_redirects_see_other() {
    let state = test_state().await;
    let repo = CompanyRepository::new(&state.db);
    let company = repo
        .create(CompanyInput {
            name: "Acme".to_string(),
            description: Some("old".to_string()),
        })
        .await
        .unwrap();

    let response = app(&state)
        .oneshot(json_request(
            Method::PUT,
            &format!("/company/{}", company.id),
            json!({ "name": "Acme Ltda" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = set_cookie(&response);
    assert_eq!(cookie.name(), "flash");
    assert_eq!(cookie.value(), "Empresa atualizada com sucesso!");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));

    let updated = repo.get_by_id(company.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "Acme Ltda");
    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn test_update_unknown_company_is_not_found() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(json_request(
            Method::PUT,
            "/company/42",
            json!({ "name": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_too_long_name_keeps_row() {
    let state = test_state().await;
    let id = seed_company(&state.db, "Acme").await;

    let response = app(&state)
        .oneshot(json_request(
            Method::PUT,
            &format!("/company/{}", id),
            json!({ "name": "x".repeat(256) }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_json(response).await;
    assert_eq!(
        page["props"]["errors"]["name"],
        "The name field must not be greater than 255 characters."
    );

    let stored = CompanyRepository::new(&state.db)
        .get_by_id(id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Acme");
}

#[tokio::test]
async fn test_destroy_cascades_and_redirects() {
    let state = test_state().await;
    let id = seed_company(&state.db, "Acme").await;
    let machine = MachineRepository::new(&state.db)
        .create(MachineInput::new("X", id))
        .await
        .unwrap();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/company/{}", id))
        .header("X-Inertia", "true")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/company");
    assert!(
        MachineRepository::new(&state.db)
            .get_by_id(machine.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_destroy_unknown_company_is_not_found() {
    let state = test_state().await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/company/7")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_lists_company_routes() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/company"]["get"].is_object());
    assert!(doc["paths"]["/company/{id}"]["delete"].is_object());
}

#[tokio::test]
async fn test_ids_outside_i32_are_not_found() {
    let state = test_state().await;

    for uri in ["/company/3000000000", "/company/abc", "/company/-0x1"] {
        let response = app(&state).oneshot(inertia_get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", uri);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri("/company/3000000000")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app(&state)
        .oneshot(json_request(
            Method::PUT,
            "/company/abc",
            json!({ "name": "Acme" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
