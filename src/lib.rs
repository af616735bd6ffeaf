#![doc = "The `taskforge` library crate."]
#![doc = ""]
#![doc = "Authentication (password hashing, bearer tokens, the identity middleware), the"]
#![doc = "creator-only task ownership policy, the task service, persistence and routing."]
#![doc = "The binary (`main.rs`) only reads configuration, migrates and serves."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;

use std::sync::Arc;

use actix_web::web;

use crate::auth::{AuthService, PasswordHasher, TokenIssuer};
use crate::error::AppError;
use crate::store::Store;
use crate::tasks::TaskService;

/// Everything a request handler can reach, built once at startup.
///
/// Register it on an `App` with `App::new().configure(|cfg| services.configure(cfg))`.
#[derive(Clone)]
pub struct Services {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenIssuer>,
}

impl Services {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(tokens);
        let auth = AuthService::new(store.clone(), hasher, tokens.clone())?;
        Ok(Self {
            auth: web::Data::new(auth),
            tasks: web::Data::new(TaskService::new(store)),
            tokens: web::Data::from(tokens),
        })
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone());
    }
}
