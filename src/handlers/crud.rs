//! Generic handlers shared by every table-backed resource.

use super::common::{created_response, no_content_response, ValidatedJson};
use crate::{
    errors::ServiceError,
    services::crud::{ChildOf, Editable, ListParams, Resource},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::{Json, Response},
    routing::get,
    Router,
};
use sea_orm::IntoActiveModel;
use uuid::Uuid;

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<PaginatedResponse<R::Model>> {
    let page = state.crud.list::<R>(params).await?;
    Ok(Json(ApiResponse::success(page.into())))
}

pub async fn list_children<R, P>(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<PaginatedResponse<R::Model>>
where
    R: ChildOf<P>,
    P: Resource,
{
    let page = state.crud.list_children::<R, P>(parent_id, params).await?;
    Ok(Json(ApiResponse::success(page.into())))
}

pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<R::Model> {
    let model = state.crud.get::<R>(id).await?;
    Ok(Json(ApiResponse::success(model)))
}

pub async fn create<R>(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<R::Input>,
) -> Result<Response, ServiceError>
where
    R: Editable,
    R::Model: IntoActiveModel<R::ActiveModel>,
{
    let model = state.crud.create::<R>(input).await?;
    Ok(created_response(model))
}

pub async fn replace<R>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<R::Input>,
) -> ApiResult<R::Model>
where
    R: Editable,
    R::Model: IntoActiveModel<R::ActiveModel>,
{
    let model = state.crud.replace::<R>(id, input).await?;
    Ok(Json(ApiResponse::success(model)))
}

pub async fn delete<R>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError>
where
    R: Editable,
    R::Model: IntoActiveModel<R::ActiveModel>,
{
    state.crud.delete::<R>(id).await?;
    Ok(no_content_response())
}

/// `GET|POST <path>` and `GET|PUT|DELETE <path>/:id`
pub fn crud_routes<R>(path: &str) -> Router<AppState>
where
    R: Editable,
    R::Model: IntoActiveModel<R::ActiveModel>,
{
    Router::new()
        .route(path, get(list::<R>).post(create::<R>))
        .route(
            &format!("{path}/:id"),
            get(get_one::<R>).put(replace::<R>).delete(delete::<R>),
        )
}

/// `GET <path>` and `GET <path>/:id`
pub fn read_routes<R: Resource>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(list::<R>))
        .route(&format!("{path}/:id"), get(get_one::<R>))
}

/// `GET <parent_path>/:id/<child>` listing rows of `R` owned by one `P`
pub fn child_routes<R, P>(parent_path: &str, child: &str) -> Router<AppState>
where
    R: ChildOf<P>,
    P: Resource,
{
    Router::new().route(
        &format!("{parent_path}/:id/{child}"),
        get(list_children::<R, P>),
    )
}
