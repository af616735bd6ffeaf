mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{init_app, json_body, register_user, send, services};

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let services = services();
    let app = init_app(&services).await;

    let registered = register_user(&app, "u@x.com", "secret12").await;
    assert!(!registered.token.is_empty(), "Token should be a non-empty string");
    assert_eq!(services.tokens.verify(&registered.token).unwrap(), registered.id);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "u@x.com", "password": "secret12" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(
        status,
        StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );

    let login_response: taskforge::auth::AuthResponse =
        serde_json::from_slice(&body).expect("Failed to parse login response JSON");
    assert_eq!(login_response.user_id, registered.id);
    assert_eq!(
        services.tokens.verify(&login_response.token).unwrap(),
        registered.id
    );
}

#[actix_rt::test]
async fn test_login_accepts_unnormalized_email() {
    let services = services();
    let app = init_app(&services).await;
    let registered = register_user(&app, "Person@Example.com", "secret12").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "  person@EXAMPLE.com ", "password": "secret12" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["user_id"], registered.id.to_string());
}

#[actix_rt::test]
async fn test_duplicate_registration_is_conflict() {
    let services = services();
    let app = init_app(&services).await;
    register_user(&app, "A@B.com", "secret12").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "first_name": "Other",
            "last_name": "Person",
            "email": " a@b.com ",
            "password": "different-secret"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        json_body(&body),
        json!({ "code": 409, "message": "email already registered" })
    );
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let services = services();
    let app = init_app(&services).await;

    let test_cases = vec![
        (
            json!({ "last_name": "Doe", "email": "test@example.com", "password": "secret12" }),
            "missing first name",
        ),
        (
            json!({ "first_name": "John", "last_name": "Doe", "password": "secret12" }),
            "missing email",
        ),
        (
            json!({ "first_name": "John", "last_name": "Doe", "email": "test@example.com" }),
            "missing password",
        ),
        (
            json!({ "first_name": "John", "last_name": "Doe", "email": "invalid-email", "password": "secret12" }),
            "invalid email format",
        ),
        (
            json!({ "first_name": "J", "last_name": "Doe", "email": "test@example.com", "password": "secret12" }),
            "first name too short",
        ),
        (
            json!({ "first_name": "John", "last_name": " D ", "email": "test@example.com", "password": "secret12" }),
            "last name too short after trimming",
        ),
        (
            json!({ "first_name": "John", "last_name": "Doe", "email": "test@example.com", "password": "123" }),
            "password too short",
        ),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body)
        );
        assert_eq!(json_body(&body)["code"], 400, "{}", description);
    }

    // None of the rejected payloads created an account.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "test@example.com", "password": "secret12" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let services = services();
    let app = init_app(&services).await;
    register_user(&app, "login_test_user@example.com", "secret12").await;

    let bad_requests = vec![
        (json!({ "password": "secret12" }), "missing email"),
        (json!({ "email": "login_test_user@example.com" }), "missing password"),
        (json!({ "email": "invalid-email", "password": "secret12" }), "invalid email format"),
        (json!({ "email": "login_test_user@example.com", "password": "" }), "empty password"),
    ];
    for (payload, description) in bad_requests {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "Test case failed: {}", description);
    }

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "login_test_user@example.com", "password": "WrongPassword1" }))
        .to_request();
    let (wrong_status, wrong_body) = send(&app, wrong_password).await;

    let unknown_user = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nonexistent@example.com", "password": "secret12" }))
        .to_request();
    let (unknown_status, unknown_body) = send(&app, unknown_user).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(
        json_body(&wrong_body),
        json!({ "code": 401, "message": "invalid credentials" })
    );
}

#[actix_rt::test]
async fn test_login_with_password_past_bcrypt_limit_is_rejected() {
    let services = services();
    let app = init_app(&services).await;
    let password = "p".repeat(72);
    register_user(&app, "limit@example.com", &password).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "limit@example.com", "password": format!("{}WRONG", password) }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(&body),
        json!({ "code": 401, "message": "invalid credentials" })
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "first_name": "Too",
            "last_name": "Long",
            "email": "longer@example.com",
            "password": "p".repeat(73)
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_malformed_json_body() {
    let services = services();
    let app = init_app(&services).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["code"], 400);
}

#[actix_rt::test]
async fn test_health_and_ping_are_public() {
    let services = services();
    let app = init_app(&services).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "ok");

    let (status, body) = send(&app, test::TestRequest::get().uri("/ping").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Pong");
}
