use super::enums::EquipmentStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single slot machine, tracked by manufacturer serial number
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "slots")]
#[schema(as = Slot)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub location_id: Option<Uuid>,
    pub cabinet_id: Option<Uuid>,
    pub game_mix_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub denomination: Option<Decimal>,
    pub max_bet: Option<Decimal>,
    /// Return-to-player, in percent
    pub rtp_percent: Option<Decimal>,
    pub status: EquipmentStatus,
    pub commissioned_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
        belongs_to = "super::cabinet::Entity",
        from = "Column::CabinetId",
        to = "super::cabinet::Column::Id"
    )]
    Cabinet,
    #[sea_orm(
        belongs_to = "super::game_mix::Entity",
        from = "Column::GameMixId",
        to = "super::game_mix::Column::Id"
    )]
    GameMix,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::cabinet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cabinet.def()
    }
}

impl Related<super::game_mix::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMix.def()
    }
}

timestamped_active_model!();
