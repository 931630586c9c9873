use super::enums::PaymentMethod;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One payment received against an automated bill
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "payment_history")]
#[schema(as = Payment)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub automated_bill_id: Uuid,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub payment_method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::automated_bill::Entity",
        from = "Column::AutomatedBillId",
        to = "super::automated_bill::Column::Id"
    )]
    AutomatedBill,
}

impl Related<super::automated_bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutomatedBill.def()
    }
}

timestamped_active_model!();
