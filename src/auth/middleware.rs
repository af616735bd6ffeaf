use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::auth::{
    extractors::Requester,
    token::{TokenIssuer, INVALID_TOKEN},
};
use crate::error::AppError;

/// Resolves the identity behind a raw `Authorization` header value.
///
/// Anything other than `Bearer <token>` with a token that verifies is
/// `Unauthorized(INVALID_TOKEN)`, so a missing header and a forged token look the same.
pub fn authenticate_request(raw_header: Option<&str>, tokens: &TokenIssuer) -> Result<Uuid, AppError> {
    let token = raw_header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN.into()))?;

    tokens.verify(token)
}

/// Guards a scope: every request must carry a valid bearer token.
///
/// On success the subject is stored as a [`Requester`] in the request extensions, where it
/// lives exactly as long as the request. The verifier is taken from the application data
/// registered at startup.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let resolved = match req.app_data::<web::Data<TokenIssuer>>() {
            Some(tokens) => {
                let raw_header = req
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok());
                authenticate_request(raw_header, tokens)
            }
            None => Err(AppError::Internal(
                "token verifier is not registered as app data".into(),
            )),
        };

        match resolved {
            Ok(subject) => {
                req.extensions_mut().insert(Requester(subject));
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, App, HttpResponse};
    use chrono::Duration;

    const SECRET: &str = "middleware-test-secret";

    #[test]
    fn test_authenticate_request() {
        let tokens = TokenIssuer::new(SECRET);
        let subject = Uuid::new_v4();
        let token = tokens.issue(subject).unwrap();

        let header = format!("Bearer {}", token);
        assert_eq!(authenticate_request(Some(&header), &tokens), Ok(subject));

        for bad in [
            None,
            Some(""),
            Some("Bearer "),
            Some("Bearer    "),
            Some(token.as_str()),
            Some("Token abc"),
            Some("bearer abc"),
            Some("Bearer invalid.token.here"),
        ] {
            assert_eq!(
                authenticate_request(bad, &tokens),
                Err(AppError::Unauthorized(INVALID_TOKEN.into())),
                "header {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_expired_and_forged_tokens_look_alike() {
        let tokens = TokenIssuer::new(SECRET);
        let expired = TokenIssuer::with_ttl(SECRET, Duration::seconds(-5))
            .issue(Uuid::new_v4())
            .unwrap();
        let forged = TokenIssuer::new("someone-else").issue(Uuid::new_v4()).unwrap();

        let expired_err = authenticate_request(Some(&format!("Bearer {}", expired)), &tokens);
        let forged_err = authenticate_request(Some(&format!("Bearer {}", forged)), &tokens);
        assert!(expired_err.is_err());
        assert_eq!(expired_err, forged_err);
    }

    async fn whoami(requester: Requester) -> HttpResponse {
        HttpResponse::Ok().body(requester.0.to_string())
    }

    #[actix_rt::test]
    async fn test_middleware_injects_requester() {
        let tokens = web::Data::new(TokenIssuer::new(SECRET));
        let subject = Uuid::new_v4();
        let token = tokens.issue(subject).unwrap();

        let app = actix_test::init_service(
            App::new()
                .app_data(tokens.clone())
                .service(web::scope("/p").wrap(AuthMiddleware).route("", web::get().to(whoami))),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/p")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, subject.to_string().as_bytes());

        let req = actix_test::TestRequest::get().uri("/p").to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_missing_verifier_is_internal_error() {
        let app = actix_test::init_service(
            App::new().service(web::scope("/p").wrap(AuthMiddleware).route("", web::get().to(whoami))),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/p")
            .insert_header((header::AUTHORIZATION, "Bearer whatever"))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
