use crate::{
    auth::{AuthService, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
///
/// ## Responses:
/// - `201 Created`: `{ "token": ..., "user_id": ... }`
/// - `400 Bad Request`: malformed body or invalid fields.
/// - `409 Conflict`: the email is already registered.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Authenticates a user and returns an authentication token.
///
/// ## Responses:
/// - `200 OK`: `{ "token": ..., "user_id": ... }`
/// - `400 Bad Request`: malformed body or invalid fields.
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
