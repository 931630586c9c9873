use super::{non_negative, ordered_dates, validate_currency};
use crate::config::AppConfig;
use crate::entities::{
    company, invoice, legal_document, location, onjn_report, rent_agreement, InvoiceStatus,
    OnjnReportStatus,
};
use crate::errors::ServiceError;
use crate::services::crud::{ensure_exists, ensure_exists_opt, Editable, Resource};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, DatabaseConnection, IntoActiveModel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn currency_or_default(currency: Option<String>, config: &AppConfig) -> String {
    currency.unwrap_or_else(|| config.default_currency.clone())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "invoice_dates"))]
pub struct InvoiceInput {
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: String,
    pub company_id: Uuid,
    pub location_id: Option<Uuid>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(custom = "non_negative")]
    pub amount: Decimal,
    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,
    #[serde(default = "default_invoice_status")]
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

fn default_invoice_status() -> InvoiceStatus {
    InvoiceStatus::Draft
}

fn invoice_dates(input: &InvoiceInput) -> Result<(), ValidationError> {
    ordered_dates(input.issue_date, Some(input.due_date), "due_before_issue")
}

impl Resource for invoice::Entity {
    type Entity = Self;
    type Model = invoice::Model;
    type Column = invoice::Column;
    const NAME: &'static str = "invoice";

    fn id_column() -> invoice::Column {
        invoice::Column::Id
    }

    fn search_columns() -> Vec<invoice::Column> {
        vec![invoice::Column::InvoiceNumber, invoice::Column::Notes]
    }

    fn order_column() -> invoice::Column {
        invoice::Column::CreatedAt
    }

    fn active_column() -> Option<invoice::Column> {
        Some(invoice::Column::IsActive)
    }
}

#[async_trait]
impl Editable for invoice::Entity {
    type ActiveModel = invoice::ActiveModel;
    type Input = InvoiceInput;

    fn create(input: InvoiceInput, config: &AppConfig) -> invoice::ActiveModel {
        fill_invoice(invoice::ActiveModel::default(), input, config)
    }

    fn replace(model: invoice::Model, input: InvoiceInput, config: &AppConfig) -> invoice::ActiveModel {
        fill_invoice(model.into_active_model(), input, config)
    }

    fn deactivate(model: invoice::Model) -> Option<invoice::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(input: &InvoiceInput, db: &DatabaseConnection) -> Result<(), ServiceError> {
        ensure_exists::<company::Entity>(db, input.company_id).await?;
        ensure_exists_opt::<location::Entity>(db, input.location_id).await
    }
}

fn fill_invoice(
    mut active: invoice::ActiveModel,
    input: InvoiceInput,
    config: &AppConfig,
) -> invoice::ActiveModel {
    active.invoice_number = Set(input.invoice_number);
    active.company_id = Set(input.company_id);
    active.location_id = Set(input.location_id);
    active.issue_date = Set(input.issue_date);
    active.due_date = Set(input.due_date);
    active.amount = Set(input.amount);
    active.currency = Set(currency_or_default(input.currency, config));
    active.status = Set(input.status);
    active.notes = Set(input.notes);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "agreement_dates"))]
pub struct RentAgreementInput {
    #[validate(length(min = 1, max = 64))]
    pub agreement_number: String,
    pub company_id: Uuid,
    pub location_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[validate(custom = "non_negative")]
    pub monthly_rent: Decimal,
    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,
    pub terms: Option<String>,
    pub is_active: Option<bool>,
}

fn agreement_dates(input: &RentAgreementInput) -> Result<(), ValidationError> {
    ordered_dates(input.start_date, input.end_date, "agreement_period")
}

impl Resource for rent_agreement::Entity {
    type Entity = Self;
    type Model = rent_agreement::Model;
    type Column = rent_agreement::Column;
    const NAME: &'static str = "rent agreement";

    fn id_column() -> rent_agreement::Column {
        rent_agreement::Column::Id
    }

    fn search_columns() -> Vec<rent_agreement::Column> {
        vec![
            rent_agreement::Column::AgreementNumber,
            rent_agreement::Column::Terms,
        ]
    }

    fn order_column() -> rent_agreement::Column {
        rent_agreement::Column::CreatedAt
    }

    fn active_column() -> Option<rent_agreement::Column> {
        Some(rent_agreement::Column::IsActive)
    }
}

#[async_trait]
impl Editable for rent_agreement::Entity {
    type ActiveModel = rent_agreement::ActiveModel;
    type Input = RentAgreementInput;

    fn create(input: RentAgreementInput, config: &AppConfig) -> rent_agreement::ActiveModel {
        fill_rent_agreement(rent_agreement::ActiveModel::default(), input, config)
    }

    fn replace(
        model: rent_agreement::Model,
        input: RentAgreementInput,
        config: &AppConfig,
    ) -> rent_agreement::ActiveModel {
        fill_rent_agreement(model.into_active_model(), input, config)
    }

    fn deactivate(model: rent_agreement::Model) -> Option<rent_agreement::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(
        input: &RentAgreementInput,
        db: &DatabaseConnection,
    ) -> Result<(), ServiceError> {
        ensure_exists::<company::Entity>(db, input.company_id).await?;
        ensure_exists_opt::<location::Entity>(db, input.location_id).await
    }
}

fn fill_rent_agreement(
    mut active: rent_agreement::ActiveModel,
    input: RentAgreementInput,
    config: &AppConfig,
) -> rent_agreement::ActiveModel {
    active.agreement_number = Set(input.agreement_number);
    active.company_id = Set(input.company_id);
    active.location_id = Set(input.location_id);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.monthly_rent = Set(input.monthly_rent);
    active.currency = Set(currency_or_default(input.currency, config));
    active.terms = Set(input.terms);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "document_dates"))]
pub struct LegalDocumentInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 64))]
    pub document_type: String,
    pub reference_number: Option<String>,
    pub company_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub issued_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

fn document_dates(input: &LegalDocumentInput) -> Result<(), ValidationError> {
    ordered_dates(input.issued_on, input.expires_on, "expires_before_issue")
}

impl Resource for legal_document::Entity {
    type Entity = Self;
    type Model = legal_document::Model;
    type Column = legal_document::Column;
    const NAME: &'static str = "legal document";

    fn id_column() -> legal_document::Column {
        legal_document::Column::Id
    }

    fn search_columns() -> Vec<legal_document::Column> {
        vec![
            legal_document::Column::Title,
            legal_document::Column::DocumentType,
            legal_document::Column::ReferenceNumber,
        ]
    }

    fn order_column() -> legal_document::Column {
        legal_document::Column::CreatedAt
    }

    fn active_column() -> Option<legal_document::Column> {
        Some(legal_document::Column::IsActive)
    }
}

#[async_trait]
impl Editable for legal_document::Entity {
    type ActiveModel = legal_document::ActiveModel;
    type Input = LegalDocumentInput;

    fn create(input: LegalDocumentInput, _config: &AppConfig) -> legal_document::ActiveModel {
        fill_legal_document(legal_document::ActiveModel::default(), input)
    }

    fn replace(
        model: legal_document::Model,
        input: LegalDocumentInput,
        _config: &AppConfig,
    ) -> legal_document::ActiveModel {
        fill_legal_document(model.into_active_model(), input)
    }

    fn deactivate(model: legal_document::Model) -> Option<legal_document::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(
        input: &LegalDocumentInput,
        db: &DatabaseConnection,
    ) -> Result<(), ServiceError> {
        ensure_exists_opt::<company::Entity>(db, input.company_id).await?;
        ensure_exists_opt::<location::Entity>(db, input.location_id).await
    }
}

fn fill_legal_document(
    mut active: legal_document::ActiveModel,
    input: LegalDocumentInput,
) -> legal_document::ActiveModel {
    active.title = Set(input.title);
    active.document_type = Set(input.document_type);
    active.reference_number = Set(input.reference_number);
    active.company_id = Set(input.company_id);
    active.location_id = Set(input.location_id);
    active.issued_on = Set(input.issued_on);
    active.expires_on = Set(input.expires_on);
    active.notes = Set(input.notes);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "onjn_period"))]
pub struct OnjnReportInput {
    #[validate(length(min = 1, max = 64))]
    pub report_number: String,
    pub company_id: Uuid,
    pub location_id: Option<Uuid>,
    #[validate(length(min = 1, max = 64))]
    pub report_type: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default = "default_onjn_status")]
    pub status: OnjnReportStatus,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

fn default_onjn_status() -> OnjnReportStatus {
    OnjnReportStatus::Draft
}

fn onjn_period(input: &OnjnReportInput) -> Result<(), ValidationError> {
    ordered_dates(input.period_start, Some(input.period_end), "report_period")
}

impl Resource for onjn_report::Entity {
    type Entity = Self;
    type Model = onjn_report::Model;
    type Column = onjn_report::Column;
    const NAME: &'static str = "ONJN report";

    fn id_column() -> onjn_report::Column {
        onjn_report::Column::Id
    }

    fn search_columns() -> Vec<onjn_report::Column> {
        vec![
            onjn_report::Column::ReportNumber,
            onjn_report::Column::ReportType,
        ]
    }

    fn order_column() -> onjn_report::Column {
        onjn_report::Column::CreatedAt
    }

    fn active_column() -> Option<onjn_report::Column> {
        Some(onjn_report::Column::IsActive)
    }
}

#[async_trait]
impl Editable for onjn_report::Entity {
    type ActiveModel = onjn_report::ActiveModel;
    type Input = OnjnReportInput;

    fn create(input: OnjnReportInput, _config: &AppConfig) -> onjn_report::ActiveModel {
        fill_onjn_report(onjn_report::ActiveModel::default(), None, input)
    }

    fn replace(
        model: onjn_report::Model,
        input: OnjnReportInput,
        _config: &AppConfig,
    ) -> onjn_report::ActiveModel {
        let submitted_at = model.submitted_at;
        fill_onjn_report(model.into_active_model(), submitted_at, input)
    }

    fn deactivate(model: onjn_report::Model) -> Option<onjn_report::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(input: &OnjnReportInput, db: &DatabaseConnection) -> Result<(), ServiceError> {
        ensure_exists::<company::Entity>(db, input.company_id).await?;
        ensure_exists_opt::<location::Entity>(db, input.location_id).await
    }
}

/// `submitted_at` is stamped the first time a report leaves draft
fn fill_onjn_report(
    mut active: onjn_report::ActiveModel,
    submitted_at: Option<chrono::DateTime<Utc>>,
    input: OnjnReportInput,
) -> onjn_report::ActiveModel {
    let submitted_at = match input.status {
        OnjnReportStatus::Draft => submitted_at,
        _ => submitted_at.or_else(|| Some(Utc::now())),
    };

    active.report_number = Set(input.report_number);
    active.company_id = Set(input.company_id);
    active.location_id = Set(input.location_id);
    active.report_type = Set(input.report_type);
    active.period_start = Set(input.period_start);
    active.period_end = Set(input.period_end);
    active.status = Set(input.status);
    active.submitted_at = Set(submitted_at);
    active.notes = Set(input.notes);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invoice_due_date_must_follow_issue_date() {
        let input: InvoiceInput = serde_json::from_value(json!({
            "invoice_number": "INV-2024-001",
            "company_id": Uuid::new_v4(),
            "issue_date": "2024-03-10",
            "due_date": "2024-03-01",
            "amount": "1200.00"
        }))
        .unwrap();

        let errors = input.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn currency_must_be_iso_code() {
        let input: RentAgreementInput = serde_json::from_value(json!({
            "agreement_number": "RA-17",
            "company_id": Uuid::new_v4(),
            "start_date": "2024-01-01",
            "monthly_rent": "3500",
            "currency": "lei"
        }))
        .unwrap();

        assert!(input.validate().unwrap_err().field_errors().contains_key("currency"));
    }

    #[test]
    fn submitted_at_set_when_leaving_draft() {
        let input: OnjnReportInput = serde_json::from_value(json!({
            "report_number": "ONJN-2024-03",
            "company_id": Uuid::new_v4(),
            "report_type": "monthly_taxes",
            "period_start": "2024-03-01",
            "period_end": "2024-03-31",
            "status": "submitted"
        }))
        .unwrap();

        let active = fill_onjn_report(onjn_report::ActiveModel::default(), None, input);
        assert!(matches!(active.submitted_at, Set(Some(_))));
    }
}
