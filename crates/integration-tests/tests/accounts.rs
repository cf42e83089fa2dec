//! End-to-end tests for the account API.
//!
//! Most of these need a live `PostgreSQL` (see `TIENDA_TEST_DATABASE_URL`)
//! and are ignored by default:
//!
//! ```bash
//! cargo test -p tienda-integration-tests -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use serde_json::{Value, json};

use tienda_integration_tests::{spawn_app, spawn_app_with_db, spawn_server, test_database_url};

/// Unique suffix so repeated runs never collide on the unique columns.
fn unique_suffix() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
}

fn registration_body(suffix: u128) -> Value {
    json!({
        "username": format!("user_{suffix}"),
        "email": format!("user_{suffix}@example.com"),
        "password": "contrasena-segura",
        "password2": "contrasena-segura",
        "first_name": "Ada",
        "last_name": "Lovelace"
    })
}

async fn spawn_accounts_app() -> String {
    // The product gateway is unused here; an empty mock keeps the config
    // honest without standing up anything real.
    spawn_app_with_db(spawn_server(Router::new()).await).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().cookie_store(true).build().unwrap()
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn register_login_profile_flow() {
    let app = spawn_accounts_app().await;
    let client = client();
    let suffix = unique_suffix();
    let registration = registration_body(suffix);

    let response = client
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["username"], registration["username"]);
    assert_eq!(body["user"]["email"], registration["email"]);
    assert_eq!(body["user"]["first_name"], json!("Ada"));
    // The hash must never leave the service.
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let response = client
        .post(format!("{app}/accounts/api/login/"))
        .json(&json!({
            "username": registration["username"],
            "password": "contrasena-segura"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));

    // The session cookie from login authenticates the profile read.
    let response = client
        .get(format!("{app}/accounts/api/profile/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], registration["username"]);

    // Logout invalidates it.
    let response = client
        .post(format!("{app}/accounts/api/logout/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{app}/accounts/api/profile/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn register_rejects_password_mismatch() {
    let app = spawn_accounts_app().await;
    let mut registration = registration_body(unique_suffix());
    registration["password2"] = json!("otra-cosa");

    let response = client()
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["errors"]["password"],
        json!("Las contraseñas no coinciden")
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn register_rejects_short_password() {
    let app = spawn_accounts_app().await;
    let mut registration = registration_body(unique_suffix());
    registration["password"] = json!("corta");
    registration["password2"] = json!("corta");

    let response = client()
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["password"],
        json!("La contraseña debe tener al menos 8 caracteres")
    );
}

#[tokio::test]
async fn register_missing_confirmation_is_field_error() {
    // Validation fails before the store is touched, so no database is
    // needed; a missing key must produce the field-level envelope, not a
    // framework rejection.
    let app = spawn_app(spawn_server(Router::new()).await).await;
    let mut registration = registration_body(unique_suffix());
    registration.as_object_mut().unwrap().remove("password2");

    let response = client()
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["errors"]["password"],
        json!("Las contraseñas no coinciden")
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn register_rejects_duplicate_email() {
    let app = spawn_accounts_app().await;
    let client = client();
    let suffix = unique_suffix();
    let registration = registration_body(suffix);

    let response = client
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // Same email, fresh username.
    let mut second = registration.clone();
    second["username"] = json!(format!("other_{suffix}"));

    let response = client
        .post(format!("{app}/accounts/api/register/"))
        .json(&second)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["email"],
        json!("Ya existe un usuario con este correo electrónico")
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn login_rejects_wrong_password() {
    let app = spawn_accounts_app().await;
    let client = client();
    let suffix = unique_suffix();

    client
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration_body(suffix))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{app}/accounts/api/login/"))
        .json(&json!({
            "username": format!("user_{suffix}"),
            "password": "equivocada-totalmente"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["errors"]["authentication"],
        json!("Credenciales incorrectas. Por favor, verifica tu usuario y contraseña.")
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn login_rejects_deactivated_account() {
    let app = spawn_accounts_app().await;
    let client = client();
    let suffix = unique_suffix();

    client
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration_body(suffix))
        .send()
        .await
        .unwrap();

    // Deactivate the account behind the service's back.
    let pool = sqlx::PgPool::connect(&test_database_url()).await.unwrap();
    sqlx::query("UPDATE users SET is_active = FALSE WHERE username = $1")
        .bind(format!("user_{suffix}"))
        .execute(&pool)
        .await
        .unwrap();

    // Correct credentials still must not get in.
    let response = client
        .post(format!("{app}/accounts/api/login/"))
        .json(&json!({
            "username": format!("user_{suffix}"),
            "password": "contrasena-segura"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["errors"]["inactive"],
        json!("Esta cuenta está desactivada.")
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn login_requires_both_fields() {
    let app = spawn_accounts_app().await;

    let response = client()
        .post(format!("{app}/accounts/api/login/"))
        .json(&json!({"username": "", "password": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["required"],
        json!("Debe incluir usuario y contraseña.")
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn login_rejects_unknown_username() {
    let app = spawn_accounts_app().await;

    let response = client()
        .post(format!("{app}/accounts/api/login/"))
        .json(&json!({
            "username": format!("nobody_{}", unique_suffix()),
            "password": "alguna-clave"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn check_username_reports_availability() {
    let app = spawn_accounts_app().await;
    let client = client();
    let suffix = unique_suffix();

    let response = client
        .get(format!("{app}/accounts/api/check-username/"))
        .query(&[("username", format!("user_{suffix}"))])
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["available"], json!(true));

    client
        .post(format!("{app}/accounts/api/register/"))
        .json(&registration_body(suffix))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{app}/accounts/api/check-username/"))
        .query(&[("username", format!("user_{suffix}"))])
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["available"], json!(false));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn readiness_reports_database_health() {
    let app = spawn_accounts_app().await;

    let response = reqwest::get(format!("{app}/health/ready")).await.unwrap();
    assert_eq!(response.status(), 200);
}
