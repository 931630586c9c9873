use super::enums::BillStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Bill produced by the billing engine for one location billing period
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "automated_bills")]
#[schema(as = AutomatedBill)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub bill_number: String,
    pub location_billing_id: Uuid,
    pub revenue_report_id: Option<Uuid>,
    pub location_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub revenue_basis: Decimal,
    pub base_rent_amount: Decimal,
    pub revenue_share_amount: Decimal,
    pub minimum_guarantee_adjustment: Decimal,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub currency: String,
    pub status: BillStatus,
    pub due_date: NaiveDate,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn outstanding(&self) -> Decimal {
        (self.total_amount - self.amount_paid).max(Decimal::ZERO)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location_billing::Entity",
        from = "Column::LocationBillingId",
        to = "super::location_billing::Column::Id"
    )]
    LocationBilling,
    #[sea_orm(
        belongs_to = "super::revenue_report::Entity",
        from = "Column::RevenueReportId",
        to = "super::revenue_report::Column::Id"
    )]
    RevenueReport,
    #[sea_orm(has_many = "super::payment_history::Entity")]
    Payments,
}

impl Related<super::location_billing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationBilling.def()
    }
}

impl Related<super::revenue_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueReport.def()
    }
}

impl Related<super::payment_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

timestamped_active_model!();
