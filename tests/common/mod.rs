#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::web::Bytes;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use taskforge::auth::{PasswordHasher, TokenIssuer};
use taskforge::routes::{self, health};
use taskforge::store::MemoryStore;
use taskforge::Services;

pub const SECRET: &str = "integration-test-secret";

/// Services over a fresh in-memory store, with the cheapest bcrypt cost.
pub fn services() -> Services {
    Services::new(
        Arc::new(MemoryStore::new()),
        PasswordHasher::new(4),
        TokenIssuer::new(SECRET),
    )
    .expect("failed to build services")
}

/// The same routing the binary serves, minus CORS.
pub async fn init_app(
    services: &Services,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(Logger::default())
            .service(health::health)
            .service(health::ping)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

/// Calls the app and returns status and body, turning middleware errors into the response
/// the server would send.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Bytes)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, body)
        }
    }
}

pub fn json_body(body: &Bytes) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|e| panic!("body is not JSON ({}): {:?}", e, String::from_utf8_lossy(body)))
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub async fn register_user<S, B>(app: &S, email: &str, password: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "password": password
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );

    let parsed: taskforge::auth::AuthResponse =
        serde_json::from_slice(&body).expect("Failed to parse registration response");
    TestUser {
        id: parsed.user_id,
        token: parsed.token,
    }
}
