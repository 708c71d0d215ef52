//! HTTP surface tests driven through `actix_web::test`.

use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::{json, Value};

use elcamejob::api::auth::{password::MIN_COST, SessionStore};
use elcamejob::api::{self, state::AppState, validation};
use elcamejob::db::local::LocalStore;
use elcamejob::seed;

async fn state(seeded: bool) -> web::Data<AppState> {
    let repositories = Arc::new(LocalStore::in_memory()).into_repositories();
    if seeded {
        seed::seed_demo_data(&repositories, MIN_COST)
            .await
            .expect("seeded");
    }
    web::Data::new(AppState::new(
        repositories,
        Arc::new(SessionStore::new()),
        MIN_COST,
    ))
}

macro_rules! test_app {
    ($seeded:expr) => {
        test::init_service(
            App::new()
                .app_data(state($seeded).await)
                .app_data(validation::json_config())
                .configure(api::routes),
        )
        .await
    };
}

macro_rules! register {
    ($app:expr, $payload:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json($payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["token"].as_str().expect("token in response").to_string()
    }};
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn client_payload(email: &str) -> Value {
    json!({
        "nombres": "Laura Gómez",
        "cedula": "1020304050",
        "email": email,
        "password": "Segura#2024",
        "role": "CLIENTE",
        "direccion": "Cra 7 #12-34",
        "telefono": "3012223344"
    })
}

fn worker_payload(email: &str) -> Value {
    json!({
        "nombres": "Pedro Gómez",
        "cedula": "1020304051",
        "email": email,
        "password": "Segura#2024",
        "role": "TRABAJADOR",
        "cargo": "Pintor",
        "departamento": "Hogar"
    })
}

#[actix_web::test]
async fn register_rejects_invalid_fields() {
    let app = test_app!(false);
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "nombres": "Laura",
            "cedula": "12",
            "email": "no-es-email",
            "password": "12345",
            "role": "CLIENTE"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    for field in ["nombres", "cedula", "email", "password"] {
        assert!(body["fields"].get(field).is_some(), "missing error for {field}");
    }
}

#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let app = test_app!(false);
    register!(app, client_payload("laura@x.com"));

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(worker_payload("laura@x.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn session_lifecycle() {
    let app = test_app!(true);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "juan@demo.com", "password": "12345" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token").to_string();
    assert_eq!(body["user"]["role"], "CLIENTE");
    assert!(body["user"].get("passwordHash").is_none());

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["email"], "juan@demo.com");

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let app = test_app!(true);
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "juan@demo.com", "password": "nope" }))
        .to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn full_job_and_application_flow() {
    let app = test_app!(false);
    let client = register!(app, client_payload("laura@x.com"));
    let worker = register!(app, worker_payload("pedro@x.com"));

    // Workers cannot publish
    let req = test::TestRequest::post()
        .uri("/jobs")
        .insert_header(bearer(&worker))
        .set_json(json!({ "title": "Nope" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::post()
        .uri("/jobs")
        .insert_header(bearer(&client))
        .set_json(json!({ "title": "Pintar sala", "budget": "50000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let job_id = body["job"]["id"].as_str().expect("job id").to_string();
    assert_eq!(body["job"]["budget"], 50000.0);
    assert_eq!(body["job"]["status"], "ABIERTO");
    assert_eq!(body["job"]["category"], "General");
    assert_eq!(body["job"]["location"], "Remoto");

    let req = test::TestRequest::get().uri("/jobs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);

    let apply_uri = format!("/jobs/{job_id}/applications");
    let req = test::TestRequest::post()
        .uri(&apply_uri)
        .insert_header(bearer(&worker))
        .set_json(json!({ "message": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let application_id = body["application"]["id"]
        .as_str()
        .expect("application id")
        .to_string();

    let req = test::TestRequest::post()
        .uri(&apply_uri)
        .insert_header(bearer(&worker))
        .set_json(json!({ "message": "hi again" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    // Applicants are visible to the owner only
    let req = test::TestRequest::get()
        .uri(&apply_uri)
        .insert_header(bearer(&worker))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
    let req = test::TestRequest::get()
        .uri(&apply_uri)
        .insert_header(bearer(&client))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["applications"][0]["status"], "PENDIENTE");

    let status_uri = format!("/applications/{application_id}/status");
    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(bearer(&worker))
        .set_json(json!({ "status": "ACEPTADA" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(bearer(&client))
        .set_json(json!({ "status": "ACEPTADA" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["application"]["status"], "ACEPTADA");

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(bearer(&client))
        .set_json(json!({ "status": "RECHAZADA" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/me/jobs")
        .insert_header(bearer(&client))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["jobs"][0]["applicantCount"], 1);

    let req = test::TestRequest::get()
        .uri("/me/applications")
        .insert_header(bearer(&worker))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["applications"][0]["jobTitle"], "Pintar sala");
    assert_eq!(body["applications"][0]["status"], "ACEPTADA");
}

#[actix_web::test]
async fn unknown_application_is_not_found() {
    let app = test_app!(true);
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "juan@demo.com", "password": "12345" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token").to_string();

    let req = test::TestRequest::patch()
        .uri("/applications/missing/status")
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "ACEPTADA" }))
        .to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn protected_routes_need_a_session() {
    let app = test_app!(false);
    let req = test::TestRequest::post()
        .uri("/jobs")
        .set_json(json!({ "title": "x" }))
        .to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn health_endpoints_report_healthy_storage() {
    let app = test_app!(false);
    for path in ["/health", "/ready", "/live"] {
        let req = test::TestRequest::get().uri(path).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn malformed_bodies_get_the_uniform_error_body() {
    let app = test_app!(true);
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "juan@demo.com", "password": "12345" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token").to_string();

    let req = test::TestRequest::post()
        .uri("/jobs")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Request validation failed");
    assert_eq!(body["fields"]["message"], "Invalid JSON format");

    let req = test::TestRequest::patch()
        .uri("/applications/app_1/status")
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "QUIZAS" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Request validation failed");
    assert_eq!(
        body["fields"]["message"],
        "Invalid enum value. Check allowed values for this field"
    );

    // Nothing changed behind the rejected request
    let req = test::TestRequest::get()
        .uri("/jobs/job_1/applications")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["applications"][0]["status"], "PENDIENTE");
}

#[actix_web::test]
async fn health_endpoints_hide_storage_details() {
    let app = test_app!(false);
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert!(body.get("error").is_none());
}
