use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use common::types::MessageResponse;
use service::pagination::{ListQuery, Paginated};
use service::user::domain::{CreateUser, PublicUser, UpdateUser};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// Raw list parameters. Values that do not parse as integers count as absent.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// page size (default 10)
    pub limit: Option<String>,
    /// substring matched against the resource's text fields
    pub search: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        let int = |v: Option<String>| v.and_then(|s| s.trim().parse::<i64>().ok());
        ListQuery::new(int(p.page), int(p.limit), p.search)
    }
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(ListParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Paginated users", body = crate::openapi::UserPageDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>, Query(params): Query<ListParams>) -> Result<Json<Paginated<PublicUser>>, JsonApiError> {
    Ok(Json(state.users.find_all(params.into()).await?))
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::CreateUserDoc,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Email or phone number in use", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), JsonApiError> {
    let Json(input) = payload?;
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User with farms", body = crate::openapi::UserDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, id: Result<Path<Uuid>, PathRejection>) -> Result<Json<PublicUser>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.users.find_one(id).await?))
}

#[utoipa::path(
    patch, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = crate::openapi::UpdateUserDoc,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Email or phone number in use", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<PublicUser>, JsonApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.users.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "User still owns farms", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, id: Result<Path<Uuid>, PathRejection>) -> Result<Json<MessageResponse>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.users.remove(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_numbers_count_as_absent() {
        let q: ListQuery = ListParams { page: Some("abc".into()), limit: Some(" 25 ".into()), search: Some("kia".into()) }.into();
        assert_eq!(q.page, None);
        assert_eq!(q.limit, Some(25));
        assert_eq!(q.search.as_deref(), Some("kia"));
    }
}
