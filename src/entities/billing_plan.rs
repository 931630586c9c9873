use super::enums::{BillingFrequency, PlanType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reusable pricing template assigned to locations through `location_billing`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "billing_plans")]
#[schema(as = BillingPlan)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub plan_type: PlanType,
    pub base_rent_amount: Decimal,
    /// Share of net revenue, 0..=100
    pub revenue_share_percent: Decimal,
    pub minimum_guarantee: Option<Decimal>,
    pub currency: String,
    pub billing_frequency: BillingFrequency,
    pub payment_terms_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::location_billing::Entity")]
    LocationBillings,
}

impl Related<super::location_billing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationBillings.def()
    }
}

timestamped_active_model!();
