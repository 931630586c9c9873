//! slotfleet API library
//!
//! Fleet registry, document tracking and automated rent billing for
//! gaming-equipment operators.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use db::Page;
use entities::{
    automated_bill, billing_plan, cabinet, company, game_mix, invoice, legal_document, location,
    location_billing, onjn_report, payment_history, provider, rent_agreement, revenue_report, slot,
};
use handlers::crud::{child_routes, crud_routes, list_children, read_routes};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use services::{billing::BillingService, crud::CrudService};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<config::AppConfig>,
    pub crud: CrudService,
    pub billing: BillingService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: config::AppConfig) -> Self {
        let db = Arc::new(db);
        let config = Arc::new(config);
        Self {
            crud: CrudService::new(db.clone(), config.clone()),
            billing: BillingService::new(db.clone(), config.clone()),
            db,
            config,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Everything under `/api/v1`; resource routes require the API token when one is configured
pub fn api_v1_routes(state: AppState) -> Router<AppState> {
    let fleet = Router::new()
        .merge(crud_routes::<company::Entity>("/companies"))
        .merge(crud_routes::<location::Entity>("/locations"))
        .merge(crud_routes::<provider::Entity>("/providers"))
        .merge(crud_routes::<game_mix::Entity>("/game-mixes"))
        .merge(crud_routes::<cabinet::Entity>("/cabinets"))
        .merge(crud_routes::<slot::Entity>("/slots"))
        .merge(child_routes::<location::Entity, company::Entity>("/companies", "locations"))
        .merge(child_routes::<slot::Entity, location::Entity>("/locations", "slots"))
        .merge(child_routes::<game_mix::Entity, provider::Entity>("/providers", "game-mixes"));

    let documents = Router::new()
        .merge(crud_routes::<invoice::Entity>("/invoices"))
        .merge(crud_routes::<rent_agreement::Entity>("/rent-agreements"))
        .merge(crud_routes::<legal_document::Entity>("/legal-documents"))
        .merge(crud_routes::<onjn_report::Entity>("/onjn-reports"));

    let billing = Router::new()
        .merge(crud_routes::<billing_plan::Entity>("/billing-plans"))
        .merge(crud_routes::<location_billing::Entity>("/location-billings"))
        .merge(crud_routes::<revenue_report::Entity>("/revenue-reports"))
        .merge(read_routes::<automated_bill::Entity>("/automated-bills"))
        .merge(child_routes::<revenue_report::Entity, location::Entity>(
            "/locations",
            "revenue-reports",
        ))
        .merge(child_routes::<automated_bill::Entity, location::Entity>("/locations", "bills"))
        .route(
            "/revenue-reports/:id/verify",
            post(handlers::billing::verify_revenue_report),
        )
        .route(
            "/automated-bills/:id/cancel",
            post(handlers::billing::cancel_bill),
        )
        .route(
            "/automated-bills/:id/payments",
            get(list_children::<payment_history::Entity, automated_bill::Entity>)
                .post(handlers::billing::record_payment),
        )
        .route(
            "/locations/:id/billing-summary",
            get(handlers::billing::billing_summary),
        )
        .route("/billing/preview", post(handlers::billing::preview))
        .route("/billing/period", get(handlers::billing::period))
        .route("/billing/generate", post(handlers::billing::generate))
        .route("/billing/run", post(handlers::billing::run));

    let protected = Router::new()
        .merge(fleet)
        .merge(documents)
        .merge(billing)
        .layer(middleware::from_fn_with_state(
            state,
            middleware_helpers::require_api_token,
        ));

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(protected)
}

/// The full application: `/api/v1` plus Swagger UI, with request ids attached
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes(state.clone()))
        .merge(openapi::swagger_ui())
        .layer(middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses((status = 200, description = "Service status", body = ApiResponse<ServiceStatus>)),
    tag = "system"
)]
async fn api_status(State(state): State<AppState>) -> ApiResult<ServiceStatus> {
    Ok(Json(ApiResponse::success(ServiceStatus {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Dependency health", body = ApiResponse<HealthStatus>)),
    tag = "system"
)]
async fn health_check(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    let database = match db::check_connection(&state.db).await {
        Ok(()) => "healthy",
        Err(err) => {
            ::tracing::warn!(error = %err, "database health check failed");
            "unhealthy"
        }
    };

    Ok(Json(ApiResponse::success(HealthStatus {
        status: database.to_string(),
        database: database.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn paginated_response_counts_pages() {
        let page = Page {
            items: vec![1, 2],
            total: 5,
            page: 2,
            limit: 2,
        };
        let response = PaginatedResponse::from(page);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.items, vec![1, 2]);
    }
}
