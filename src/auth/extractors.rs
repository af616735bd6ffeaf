use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::INVALID_TOKEN;
use crate::error::AppError;

/// The authenticated identity a request acts as.
///
/// `AuthMiddleware` stores it in the request extensions; handlers take it as an argument
/// and pass the inner id explicitly to every service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub Uuid);

impl FromRequest for Requester {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Requester>().copied() {
            Some(requester) => ready(Ok(requester)),
            // Route not wrapped by AuthMiddleware.
            None => ready(Err(
                AppError::Unauthorized(INVALID_TOKEN.into()).into()
            )),
        }
    }
}
