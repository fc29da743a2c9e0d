use actix_web::test;
use jsonwebtoken::Algorithm;
use serde_json::json;
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};
use todo_api::config::AuthConfig;

/// Auth settings shared by every integration test app.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        secret_key: "integration-test-secret".to_string(),
        algorithm: Algorithm::HS256,
        access_token_expire_minutes: 30,
    }
}

/// Connects to the test database named by `DATABASE_URL` and applies the
/// migrations. Returns `None` when the variable is unset so the suite can run
/// without a database.
pub async fn try_pool() -> Option<PgPool> {
    dotenv::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        }
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// Produces a unique suffix so concurrent tests never collide on the users
/// table's unique columns.
pub fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

/// A registered user plus a valid access token for it.
pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Registers a fresh user through the API and logs it in.
pub async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
) -> TestUser {
    let suffix = unique_suffix();
    let username = format!("user_{}", suffix);
    let email = format!("user_{}@example.com", suffix);
    let password = "testtest".to_string();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    let user: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let id = user["id"].as_i64().unwrap() as i32;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", email.as_str()), ("password", password.as_str())])
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    let token_body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    TestUser {
        id,
        username,
        email,
        password,
        token: token_body["access_token"].as_str().unwrap().to_string(),
    }
}
