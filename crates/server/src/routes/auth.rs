use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use service::farm::{repository::FarmRepository, FarmService};
use service::pagination::Pagination;
use service::user::{repository::UserRepository, UserService};

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

pub type DynUserService = UserService<dyn UserRepository>;
pub type DynFarmService = FarmService<dyn FarmRepository, dyn UserRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<DynUserService>,
    pub farms: Arc<DynFarmService>,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    /// Wire both services onto one store.
    pub fn new<S>(store: Arc<S>, pagination: Pagination, auth: ServerAuthConfig) -> Self
    where
        S: UserRepository + FarmRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let farms: Arc<dyn FarmRepository> = store;
        Self {
            users: Arc::new(UserService::new(users.clone(), pagination)),
            farms: Arc::new(FarmService::new(farms, users, pagination)),
            auth,
        }
    }
}

/// Claims of the bearer token, made available to handlers as a request extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub exp: usize,
    pub iat: Option<usize>,
}

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::OPTIONS || path == "/health" || path.starts_with("/api-docs")
}

/// Global guard: everything except health, API docs and CORS preflight needs
/// `Authorization: Bearer <token>` signed with the configured secret.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let token = match req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(JsonApiError::unauthorized("Invalid authorization header"));
            }
        },
        None => {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(JsonApiError::unauthorized("Missing bearer token"));
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("Invalid or expired token"))
        }
    }
}
