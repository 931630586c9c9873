use super::common::{created_response, ValidatedJson, ValidatedJsonOrDefault};
use crate::{
    dto::billing::{GenerateBillRequest, PaymentInput, PeriodQuery, PreviewRequest, RunBillingRequest},
    entities::{automated_bill, revenue_report},
    errors::ServiceError,
    services::billing::{BillSummary, BillingPreview, BillingRunSummary, PaymentReceipt, PeriodInfo},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{Json, Response},
};
use chrono::Utc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/billing/preview",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Bill breakdown for the given revenue", body = ApiResponse<BillingPreview>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location billing not found", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn preview(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PreviewRequest>,
) -> ApiResult<BillingPreview> {
    let preview = state
        .billing
        .preview(payload.location_billing_id, payload.revenue)
        .await?;
    Ok(Json(ApiResponse::success(preview)))
}

#[utoipa::path(
    get,
    path = "/api/v1/billing/period",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Billing period containing the date", body = ApiResponse<PeriodInfo>),
        (status = 400, description = "Date precedes the billing start", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location billing not found", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn period(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<PeriodInfo> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let info = state
        .billing
        .period_for(query.location_billing_id, date)
        .await?;
    Ok(Json(ApiResponse::success(info)))
}

#[utoipa::path(
    post,
    path = "/api/v1/billing/generate",
    request_body = GenerateBillRequest,
    responses(
        (status = 201, description = "Bill generated", body = ApiResponse<automated_bill::Model>),
        (status = 400, description = "Report or assignment not billable", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location billing or report not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Period already billed", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn generate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GenerateBillRequest>,
) -> Result<Response, ServiceError> {
    let bill = state
        .billing
        .generate_bill(payload.location_billing_id, payload.revenue_report_id)
        .await?;
    Ok(created_response(bill))
}

#[utoipa::path(
    post,
    path = "/api/v1/billing/run",
    request_body(content = RunBillingRequest, description = "Optional; an empty body bills as of today"),
    responses(
        (status = 200, description = "Billing run summary", body = ApiResponse<BillingRunSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn run(
    State(state): State<AppState>,
    ValidatedJsonOrDefault(payload): ValidatedJsonOrDefault<RunBillingRequest>,
) -> ApiResult<BillingRunSummary> {
    let as_of = payload.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let summary = state.billing.run_billing(as_of).await?;
    Ok(Json(ApiResponse::success(summary)))
}

#[utoipa::path(
    post,
    path = "/api/v1/revenue-reports/{id}/verify",
    params(
        ("id" = Uuid, Path, description = "Revenue report ID")
    ),
    responses(
        (status = 200, description = "Report verified", body = ApiResponse<revenue_report::Model>),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Report already verified", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn verify_revenue_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<revenue_report::Model> {
    let report = state.billing.verify_revenue_report(id).await?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    post,
    path = "/api/v1/automated-bills/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Bill ID")
    ),
    responses(
        (status = 200, description = "Bill cancelled", body = ApiResponse<automated_bill::Model>),
        (status = 400, description = "Bill is paid, cancelled or has payments", body = crate::errors::ErrorResponse),
        (status = 404, description = "Bill not found", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn cancel_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<automated_bill::Model> {
    let bill = state.billing.cancel_bill(id).await?;
    Ok(Json(ApiResponse::success(bill)))
}

#[utoipa::path(
    post,
    path = "/api/v1/automated-bills/{id}/payments",
    request_body = PaymentInput,
    params(
        ("id" = Uuid, Path, description = "Bill ID")
    ),
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<PaymentReceipt>),
        (status = 400, description = "Invalid amount, overpayment or closed bill", body = crate::errors::ErrorResponse),
        (status = 404, description = "Bill not found", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PaymentInput>,
) -> Result<Response, ServiceError> {
    let receipt = state.billing.record_payment(id, payload).await?;
    Ok(created_response(receipt))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}/billing-summary",
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Billing totals for the location", body = ApiResponse<BillSummary>),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "billing"
)]
pub async fn billing_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BillSummary> {
    let summary = state.billing.bill_summary(id).await?;
    Ok(Json(ApiResponse::success(summary)))
}
