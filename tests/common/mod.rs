#![allow(dead_code)]

// Shared setup for the integration suites. Suites run against the database
// named by DATABASE_URL and skip cleanly when none is configured. Migrations
// run on connect, so a fresh database self-provisions.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{middleware::Logger, rt, test, web, App, Error, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use uuid::Uuid;

use taskdeck::auth::{AuthGate, TokenService};
use taskdeck::routes;

pub async fn try_pool() -> Option<PgPool> {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

pub fn token_service() -> web::Data<TokenService> {
    web::Data::new(TokenService::new("integration-test-secret"))
}

/// Builds the application exactly as served in production, minus the bind.
pub async fn init_app(
    pool: &PgPool,
    tokens: &web::Data<TokenService>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(tokens.clone())
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/api").wrap(AuthGate).configure(routes::config)),
    )
    .await
}

/// Starts the application on a random local port for tests that need real
/// HTTP, which is how middleware rejections surface as responses. Returns
/// the base URL and the handle to abort when done.
pub async fn spawn_server(pool: &PgPool) -> (String, rt::task::JoinHandle<std::io::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server_pool = pool.clone();
    let tokens = token_service();
    let handle = rt::spawn(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(server_pool.clone()))
                .app_data(tokens.clone())
                .wrap(Logger::default())
                .service(routes::health::health)
                .service(web::scope("/api").wrap(AuthGate).configure(routes::config))
        })
        .listen(listener)
        .expect("Failed to listen on test port")
        .run()
        .await
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    (format!("http://127.0.0.1:{}", port), handle)
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// Registers an account through the API and returns its id and token.
pub async fn register_user(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    name: &str,
    email: &str,
    password: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status.as_u16(),
        201,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );

    let body: serde_json::Value = serde_json::from_slice(&body).expect("Failed to parse response");
    TestUser {
        id: Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}

pub async fn promote_to_admin(pool: &PgPool, user_id: Uuid) {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to promote user");
}

pub async fn deactivate_user(pool: &PgPool, user_id: Uuid) {
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to deactivate user");
}

/// Removes a user and every task touching them, so reruns start clean.
pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .expect("Failed to look up user");

    if let Some(id) = id {
        sqlx::query("DELETE FROM tasks WHERE assigned_to = $1 OR created_by = $1")
            .bind(id)
            .execute(pool)
            .await
            .expect("Failed to delete tasks");
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .expect("Failed to delete user");
    }
}

/// A fresh address per call keeps parallel tests out of each other's way.
pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@example.com", prefix, Uuid::new_v4().simple())
}
