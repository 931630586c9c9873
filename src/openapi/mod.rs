use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Slotfleet API",
        version = "1.0.0",
        description = r#"
# Slotfleet API

Fleet registry, document tracking and automated rent billing for operators
of slot machines placed at partner locations.

## Resources

Every resource below supports `GET /api/v1/<resource>` (paginated list),
`GET /api/v1/<resource>/:id`, `POST`, `PUT` (full replacement) and `DELETE`
(soft delete where the row has `is_active`):

`companies`, `locations`, `providers`, `game-mixes`, `cabinets`, `slots`,
`invoices`, `rent-agreements`, `legal-documents`, `onjn-reports`,
`billing-plans`, `location-billings`, `revenue-reports`.

`automated-bills` is read-only apart from the billing actions.

## Authentication

When the server is configured with an API token, send it on every resource
request:

```
Authorization: Bearer <api-token>
```

## Pagination

List endpoints accept:
- `page`: page number (default: 1)
- `limit`: items per page (default: 20, max: 100)
- `search`: substring matched against the resource's text columns
- `include_inactive`: also return soft-deleted rows

## Billing

A bill total is `max(base_rent + revenue * share% / 100, minimum_guarantee)`,
with per-location overrides taking precedence over plan terms.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "billing", description = "Bill preview, generation, payments and runs"),
        (name = "system", description = "Status and health endpoints")
    ),
    paths(
        crate::api_status,
        crate::health_check,

        crate::handlers::billing::preview,
        crate::handlers::billing::period,
        crate::handlers::billing::generate,
        crate::handlers::billing::run,
        crate::handlers::billing::verify_revenue_report,
        crate::handlers::billing::cancel_bill,
        crate::handlers::billing::record_payment,
        crate::handlers::billing::billing_summary,
    ),
    components(
        schemas(
            // Common types
            crate::ServiceStatus,
            crate::HealthStatus,
            crate::errors::ErrorResponse,

            // Enums
            crate::entities::EquipmentStatus,
            crate::entities::InvoiceStatus,
            crate::entities::OnjnReportStatus,
            crate::entities::PlanType,
            crate::entities::BillingFrequency,
            crate::entities::BillStatus,
            crate::entities::PaymentMethod,

            // Fleet
            crate::entities::company::Model,
            crate::entities::location::Model,
            crate::entities::provider::Model,
            crate::entities::game_mix::Model,
            crate::entities::cabinet::Model,
            crate::entities::slot::Model,
            crate::dto::fleet::CompanyInput,
            crate::dto::fleet::LocationInput,
            crate::dto::fleet::ProviderInput,
            crate::dto::fleet::GameMixInput,
            crate::dto::fleet::CabinetInput,
            crate::dto::fleet::SlotInput,

            // Documents
            crate::entities::invoice::Model,
            crate::entities::rent_agreement::Model,
            crate::entities::legal_document::Model,
            crate::entities::onjn_report::Model,
            crate::dto::documents::InvoiceInput,
            crate::dto::documents::RentAgreementInput,
            crate::dto::documents::LegalDocumentInput,
            crate::dto::documents::OnjnReportInput,

            // Billing
            crate::entities::billing_plan::Model,
            crate::entities::location_billing::Model,
            crate::entities::revenue_report::Model,
            crate::entities::automated_bill::Model,
            crate::entities::payment_history::Model,
            crate::dto::billing::BillingPlanInput,
            crate::dto::billing::LocationBillingInput,
            crate::dto::billing::RevenueReportInput,
            crate::dto::billing::PreviewRequest,
            crate::dto::billing::GenerateBillRequest,
            crate::dto::billing::RunBillingRequest,
            crate::dto::billing::PaymentInput,
            crate::services::billing::BillingTerms,
            crate::services::billing::BillBreakdown,
            crate::services::billing::BillingPreview,
            crate::services::billing::BillingPeriod,
            crate::services::billing::PeriodInfo,
            crate::services::billing::BillingRunSummary,
            crate::services::billing::SkippedReport,
            crate::services::billing::BillSummary,
            crate::services::billing::PaymentReceipt,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_billing_actions() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Slotfleet API"));
        assert!(json.contains("/api/v1/billing/generate"));
        assert!(json.contains("BillBreakdown"));
    }

    #[test]
    fn path_parameters_use_templates() {
        let openapi = ApiDocV1::openapi();
        let paths = &openapi.paths.paths;
        for templated in [
            "/api/v1/revenue-reports/{id}/verify",
            "/api/v1/automated-bills/{id}/cancel",
            "/api/v1/automated-bills/{id}/payments",
            "/api/v1/locations/{id}/billing-summary",
        ] {
            assert!(paths.contains_key(templated), "missing {templated}");
        }
        assert!(paths.keys().all(|path| !path.contains(':')));
    }
}
