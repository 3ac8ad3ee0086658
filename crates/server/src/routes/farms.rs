use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use common::types::MessageResponse;
use service::farm::domain::{CreateFarm, FarmView, UpdateFarm};
use service::pagination::Paginated;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;
use crate::routes::users::ListParams;

#[utoipa::path(
    get, path = "/farms", tag = "farms",
    params(ListParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Paginated farms with owners", body = crate::openapi::FarmPageDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>, Query(params): Query<ListParams>) -> Result<Json<Paginated<FarmView>>, JsonApiError> {
    Ok(Json(state.farms.find_all(params.into()).await?))
}

#[utoipa::path(
    post, path = "/farms", tag = "farms",
    request_body = crate::openapi::CreateFarmDoc,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created", body = crate::openapi::FarmDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "User not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateFarm>, JsonRejection>,
) -> Result<(StatusCode, Json<FarmView>), JsonApiError> {
    let Json(input) = payload?;
    let farm = state.farms.create(input).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

#[utoipa::path(
    get, path = "/farms/{id}", tag = "farms",
    params(("id" = Uuid, Path, description = "Farm id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Farm with owner", body = crate::openapi::FarmDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, id: Result<Path<Uuid>, PathRejection>) -> Result<Json<FarmView>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.farms.find_one(id).await?))
}

#[utoipa::path(
    patch, path = "/farms/{id}", tag = "farms",
    params(("id" = Uuid, Path, description = "Farm id")),
    request_body = crate::openapi::UpdateFarmDoc,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::FarmDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateFarm>, JsonRejection>,
) -> Result<Json<FarmView>, JsonApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.farms.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/farms/{id}", tag = "farms",
    params(("id" = Uuid, Path, description = "Farm id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, id: Result<Path<Uuid>, PathRejection>) -> Result<Json<MessageResponse>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.farms.remove(id).await?))
}
