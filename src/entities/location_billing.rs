use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Assignment of a billing plan to a location for a date window.
///
/// The `*_override` columns replace the plan's values for this location only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "location_billings")]
#[schema(as = LocationBilling)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub billing_plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub base_rent_override: Option<Decimal>,
    pub revenue_share_override: Option<Decimal>,
    pub minimum_guarantee_override: Option<Decimal>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Whether `[start, end]` lies inside this assignment's window
    pub fn covers(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start >= self.start_date && self.end_date.map_or(true, |until| end <= until)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::billing_plan::Entity",
        from = "Column::BillingPlanId",
        to = "super::billing_plan::Column::Id"
    )]
    BillingPlan,
    #[sea_orm(has_many = "super::automated_bill::Entity")]
    AutomatedBills,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::billing_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingPlan.def()
    }
}

impl Related<super::automated_bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutomatedBills.def()
    }
}

timestamped_active_model!();
