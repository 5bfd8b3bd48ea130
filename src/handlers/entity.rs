use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::auth::Caller;
use crate::database::Fields;
use crate::gateway::{DeleteAck, Entity, Gateway, Page};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/{entities} - List records
pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<E>> {
    let Query(query) = query?;
    let page = Page::resolve(query.skip, query.limit, &state.config.api);

    let records = Gateway::<E>::list(state.store.as_ref(), page, &caller).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/v1/{entities}/:id - Get a single record by ID
pub async fn get<E: Entity>(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<E> {
    let Path(id) = id?;

    let record = Gateway::<E>::get(state.store.as_ref(), id, &caller).await?;
    Ok(ApiResponse::success(record))
}

/// POST /api/v1/{entities} - Create a record
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> ApiResult<E> {
    let Json(payload) = payload?;

    let record = Gateway::<E>::create(state.store.as_ref(), payload, &caller).await?;
    Ok(ApiResponse::success(record))
}

/// PUT /api/v1/{entities}/:id - Merge the supplied fields into a record
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> ApiResult<E> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let record = Gateway::<E>::update(state.store.as_ref(), id, payload, &caller).await?;
    Ok(ApiResponse::success(record))
}

/// DELETE /api/v1/{entities}/:id - Remove a record permanently
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DeleteAck> {
    let Path(id) = id?;

    let ack = Gateway::<E>::delete(state.store.as_ref(), id, &caller).await?;
    Ok(ApiResponse::success(ack))
}
