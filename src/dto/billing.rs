use super::{money, non_negative, ordered_dates, percent, validate_currency};
use crate::config::AppConfig;
use crate::entities::{
    automated_bill, billing_plan, location, location_billing, payment_history, revenue_report,
    BillingFrequency, PaymentMethod, PlanType,
};
use crate::errors::ServiceError;
use crate::services::crud::{ensure_exists, ChildOf, Editable, Resource};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, DatabaseConnection, IntoActiveModel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BillingPlanInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub plan_type: PlanType,
    #[serde(default)]
    #[validate(custom = "non_negative")]
    pub base_rent_amount: Decimal,
    #[serde(default)]
    #[validate(custom = "percent")]
    pub revenue_share_percent: Decimal,
    #[validate(custom = "non_negative")]
    pub minimum_guarantee: Option<Decimal>,
    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,
    pub billing_frequency: BillingFrequency,
    /// Defaults to the configured payment terms
    #[validate(range(max = 365))]
    pub payment_terms_days: Option<u32>,
    pub is_active: Option<bool>,
}

impl Resource for billing_plan::Entity {
    type Entity = Self;
    type Model = billing_plan::Model;
    type Column = billing_plan::Column;
    const NAME: &'static str = "billing plan";

    fn id_column() -> billing_plan::Column {
        billing_plan::Column::Id
    }

    fn search_columns() -> Vec<billing_plan::Column> {
        vec![billing_plan::Column::Name]
    }

    fn order_column() -> billing_plan::Column {
        billing_plan::Column::CreatedAt
    }

    fn active_column() -> Option<billing_plan::Column> {
        Some(billing_plan::Column::IsActive)
    }
}

impl Editable for billing_plan::Entity {
    type ActiveModel = billing_plan::ActiveModel;
    type Input = BillingPlanInput;

    fn create(input: BillingPlanInput, config: &AppConfig) -> billing_plan::ActiveModel {
        fill_billing_plan(billing_plan::ActiveModel::default(), input, config)
    }

    fn replace(
        model: billing_plan::Model,
        input: BillingPlanInput,
        config: &AppConfig,
    ) -> billing_plan::ActiveModel {
        fill_billing_plan(model.into_active_model(), input, config)
    }

    fn deactivate(model: billing_plan::Model) -> Option<billing_plan::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }
}

fn fill_billing_plan(
    mut active: billing_plan::ActiveModel,
    input: BillingPlanInput,
    config: &AppConfig,
) -> billing_plan::ActiveModel {
    let terms = input
        .payment_terms_days
        .unwrap_or(config.default_payment_terms_days);

    active.name = Set(input.name);
    active.plan_type = Set(input.plan_type);
    active.base_rent_amount = Set(input.base_rent_amount);
    active.revenue_share_percent = Set(input.revenue_share_percent);
    active.minimum_guarantee = Set(input.minimum_guarantee);
    active.currency = Set(input
        .currency
        .unwrap_or_else(|| config.default_currency.clone()));
    active.billing_frequency = Set(input.billing_frequency);
    active.payment_terms_days = Set(i32::try_from(terms).unwrap_or(i32::MAX));
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "assignment_window"))]
pub struct LocationBillingInput {
    pub location_id: Uuid,
    pub billing_plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[validate(custom = "non_negative")]
    pub base_rent_override: Option<Decimal>,
    #[validate(custom = "percent")]
    pub revenue_share_override: Option<Decimal>,
    #[validate(custom = "non_negative")]
    pub minimum_guarantee_override: Option<Decimal>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

fn assignment_window(input: &LocationBillingInput) -> Result<(), ValidationError> {
    ordered_dates(input.start_date, input.end_date, "billing_window")
}

impl Resource for location_billing::Entity {
    type Entity = Self;
    type Model = location_billing::Model;
    type Column = location_billing::Column;
    const NAME: &'static str = "location billing";

    fn id_column() -> location_billing::Column {
        location_billing::Column::Id
    }

    fn search_columns() -> Vec<location_billing::Column> {
        vec![location_billing::Column::Notes]
    }

    fn order_column() -> location_billing::Column {
        location_billing::Column::CreatedAt
    }

    fn active_column() -> Option<location_billing::Column> {
        Some(location_billing::Column::IsActive)
    }
}

#[async_trait]
impl Editable for location_billing::Entity {
    type ActiveModel = location_billing::ActiveModel;
    type Input = LocationBillingInput;

    fn create(input: LocationBillingInput, _config: &AppConfig) -> location_billing::ActiveModel {
        fill_location_billing(location_billing::ActiveModel::default(), input)
    }

    fn replace(
        model: location_billing::Model,
        input: LocationBillingInput,
        _config: &AppConfig,
    ) -> location_billing::ActiveModel {
        fill_location_billing(model.into_active_model(), input)
    }

    fn deactivate(model: location_billing::Model) -> Option<location_billing::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(
        input: &LocationBillingInput,
        db: &DatabaseConnection,
    ) -> Result<(), ServiceError> {
        ensure_exists::<location::Entity>(db, input.location_id).await?;
        ensure_exists::<billing_plan::Entity>(db, input.billing_plan_id).await
    }
}

fn fill_location_billing(
    mut active: location_billing::ActiveModel,
    input: LocationBillingInput,
) -> location_billing::ActiveModel {
    active.location_id = Set(input.location_id);
    active.billing_plan_id = Set(input.billing_plan_id);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.base_rent_override = Set(input.base_rent_override);
    active.revenue_share_override = Set(input.revenue_share_override);
    active.minimum_guarantee_override = Set(input.minimum_guarantee_override);
    active.notes = Set(input.notes);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

/// `net_revenue` may be omitted; when present it must equal `gross_revenue - payouts`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "revenue_consistency"))]
pub struct RevenueReportInput {
    pub location_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[validate(custom = "non_negative")]
    pub gross_revenue: Decimal,
    #[validate(custom = "non_negative")]
    pub payouts: Decimal,
    #[validate(custom = "money")]
    pub net_revenue: Option<Decimal>,
    pub notes: Option<String>,
}

impl RevenueReportInput {
    pub fn net(&self) -> Decimal {
        self.gross_revenue - self.payouts
    }
}

fn revenue_consistency(input: &RevenueReportInput) -> Result<(), ValidationError> {
    ordered_dates(input.period_start, Some(input.period_end), "report_period")?;

    match input.net_revenue {
        Some(net) if net != input.net() => {
            let mut err = ValidationError::new("net_revenue");
            err.message = Some("net_revenue must equal gross_revenue - payouts".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

impl Resource for revenue_report::Entity {
    type Entity = Self;
    type Model = revenue_report::Model;
    type Column = revenue_report::Column;
    const NAME: &'static str = "revenue report";

    fn id_column() -> revenue_report::Column {
        revenue_report::Column::Id
    }

    fn search_columns() -> Vec<revenue_report::Column> {
        vec![revenue_report::Column::Notes]
    }

    fn order_column() -> revenue_report::Column {
        revenue_report::Column::CreatedAt
    }
}

#[async_trait]
impl Editable for revenue_report::Entity {
    type ActiveModel = revenue_report::ActiveModel;
    type Input = RevenueReportInput;

    fn create(input: RevenueReportInput, _config: &AppConfig) -> revenue_report::ActiveModel {
        let mut active = fill_revenue_report(revenue_report::ActiveModel::default(), input);
        active.is_verified = Set(false);
        active.verified_at = Set(None);
        active
    }

    fn replace(
        model: revenue_report::Model,
        input: RevenueReportInput,
        _config: &AppConfig,
    ) -> revenue_report::ActiveModel {
        fill_revenue_report(model.into_active_model(), input)
    }

    fn guard_change(model: &revenue_report::Model) -> Result<(), ServiceError> {
        if model.is_verified {
            return Err(ServiceError::InvalidOperation(format!(
                "revenue report {} is verified and can no longer change",
                model.id
            )));
        }
        Ok(())
    }

    async fn check_references(
        input: &RevenueReportInput,
        db: &DatabaseConnection,
    ) -> Result<(), ServiceError> {
        ensure_exists::<location::Entity>(db, input.location_id).await
    }
}

fn fill_revenue_report(
    mut active: revenue_report::ActiveModel,
    input: RevenueReportInput,
) -> revenue_report::ActiveModel {
    active.net_revenue = Set(input.net());
    active.location_id = Set(input.location_id);
    active.period_start = Set(input.period_start);
    active.period_end = Set(input.period_end);
    active.gross_revenue = Set(input.gross_revenue);
    active.payouts = Set(input.payouts);
    active.notes = Set(input.notes);
    active
}

impl ChildOf<location::Entity> for revenue_report::Entity {
    fn parent_column() -> revenue_report::Column {
        revenue_report::Column::LocationId
    }
}

impl Resource for automated_bill::Entity {
    type Entity = Self;
    type Model = automated_bill::Model;
    type Column = automated_bill::Column;
    const NAME: &'static str = "automated bill";

    fn id_column() -> automated_bill::Column {
        automated_bill::Column::Id
    }

    fn search_columns() -> Vec<automated_bill::Column> {
        vec![automated_bill::Column::BillNumber]
    }

    fn order_column() -> automated_bill::Column {
        automated_bill::Column::CreatedAt
    }
}

impl ChildOf<location::Entity> for automated_bill::Entity {
    fn parent_column() -> automated_bill::Column {
        automated_bill::Column::LocationId
    }
}

impl Resource for payment_history::Entity {
    type Entity = Self;
    type Model = payment_history::Model;
    type Column = payment_history::Column;
    const NAME: &'static str = "payment";

    fn id_column() -> payment_history::Column {
        payment_history::Column::Id
    }

    fn search_columns() -> Vec<payment_history::Column> {
        vec![
            payment_history::Column::Reference,
            payment_history::Column::Notes,
        ]
    }

    fn order_column() -> payment_history::Column {
        payment_history::Column::CreatedAt
    }
}

impl ChildOf<automated_bill::Entity> for payment_history::Entity {
    fn parent_column() -> payment_history::Column {
        payment_history::Column::AutomatedBillId
    }
}

/// Body of `POST /billing/preview`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PreviewRequest {
    pub location_billing_id: Uuid,
    /// Net revenue to price; negative values price a losing period
    #[validate(custom = "money")]
    pub revenue: Decimal,
}

/// Body of `POST /billing/generate`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct GenerateBillRequest {
    pub location_billing_id: Uuid,
    pub revenue_report_id: Uuid,
}

/// Body of `POST /billing/run`; `as_of` defaults to today (UTC)
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct RunBillingRequest {
    pub as_of: Option<NaiveDate>,
}

/// Body of `POST /automated-bills/:id/payments`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PaymentInput {
    #[validate(custom = "positive")]
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    #[validate(length(max = 128))]
    pub reference: Option<String>,
    pub notes: Option<String>,
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::BankTransfer
}

fn positive(value: &Decimal) -> Result<(), ValidationError> {
    money(value)?;
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

/// Query of `GET /billing/period`
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    pub location_billing_id: Uuid,
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn report(net: Option<Decimal>) -> RevenueReportInput {
        RevenueReportInput {
            location_id: Uuid::new_v4(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            gross_revenue: dec!(50000),
            payouts: dec!(42000),
            net_revenue: net,
            notes: None,
        }
    }

    #[test]
    fn net_revenue_is_derived_or_checked() {
        assert!(report(None).validate().is_ok());
        assert!(report(Some(dec!(8000.00))).validate().is_ok());
        assert!(report(Some(dec!(7999))).validate().is_err());
        assert_eq!(report(None).net(), dec!(8000));
    }

    #[test]
    fn plan_rejects_share_above_hundred() {
        let input: BillingPlanInput = serde_json::from_value(json!({
            "name": "Greedy",
            "plan_type": "revenue_share",
            "revenue_share_percent": "120",
            "billing_frequency": "monthly"
        }))
        .unwrap();
        assert!(input
            .validate()
            .unwrap_err()
            .field_errors()
            .contains_key("revenue_share_percent"));
    }

    #[test]
    fn unknown_plan_type_fails_to_parse() {
        let parsed = serde_json::from_value::<BillingPlanInput>(json!({
            "name": "Odd",
            "plan_type": "barter",
            "billing_frequency": "monthly"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn amounts_beyond_the_money_column_are_rejected() {
        let preview: PreviewRequest = serde_json::from_value(json!({
            "location_billing_id": Uuid::new_v4(),
            "revenue": "79228162514264337593543950335"
        }))
        .unwrap();
        assert!(preview
            .validate()
            .unwrap_err()
            .field_errors()
            .contains_key("revenue"));

        let mut huge = report(Some(dec!(-1000000000000)));
        huge.gross_revenue = dec!(0);
        huge.payouts = dec!(1000000000000);
        let errors = huge.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("payouts"));
        assert!(errors.field_errors().contains_key("net_revenue"));
    }

    #[test]
    fn payment_amount_must_be_positive() {
        let input = PaymentInput {
            amount: dec!(0),
            paid_on: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            payment_method: PaymentMethod::Cash,
            reference: None,
            notes: None,
        };
        assert!(input.validate().is_err());
    }
}
