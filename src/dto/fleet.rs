use super::{non_negative, percent};
use crate::config::AppConfig;
use crate::entities::{cabinet, company, game_mix, location, provider, slot, EquipmentStatus};
use crate::errors::ServiceError;
use crate::services::crud::{ensure_exists_opt, ChildOf, Editable, Resource};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, DatabaseConnection, IntoActiveModel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CompanyInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub registration_number: String,
    #[validate(length(max = 64))]
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for company::Entity {
    type Entity = Self;
    type Model = company::Model;
    type Column = company::Column;
    const NAME: &'static str = "company";

    fn id_column() -> company::Column {
        company::Column::Id
    }

    fn search_columns() -> Vec<company::Column> {
        vec![
            company::Column::Name,
            company::Column::RegistrationNumber,
            company::Column::TaxId,
            company::Column::Email,
            company::Column::ContactPerson,
        ]
    }

    fn order_column() -> company::Column {
        company::Column::CreatedAt
    }

    fn active_column() -> Option<company::Column> {
        Some(company::Column::IsActive)
    }
}

impl Editable for company::Entity {
    type ActiveModel = company::ActiveModel;
    type Input = CompanyInput;

    fn create(input: CompanyInput, _config: &AppConfig) -> company::ActiveModel {
        fill_company(company::ActiveModel::default(), input)
    }

    fn replace(model: company::Model, input: CompanyInput, _config: &AppConfig) -> company::ActiveModel {
        fill_company(model.into_active_model(), input)
    }

    fn deactivate(model: company::Model) -> Option<company::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }
}

fn fill_company(mut active: company::ActiveModel, input: CompanyInput) -> company::ActiveModel {
    active.name = Set(input.name);
    active.registration_number = Set(input.registration_number);
    active.tax_id = Set(input.tax_id);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.address = Set(input.address);
    active.contact_person = Set(input.contact_person);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct LocationInput {
    pub company_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub contact_person: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for location::Entity {
    type Entity = Self;
    type Model = location::Model;
    type Column = location::Column;
    const NAME: &'static str = "location";

    fn id_column() -> location::Column {
        location::Column::Id
    }

    fn search_columns() -> Vec<location::Column> {
        vec![
            location::Column::Name,
            location::Column::Address,
            location::Column::City,
            location::Column::County,
        ]
    }

    fn order_column() -> location::Column {
        location::Column::CreatedAt
    }

    fn active_column() -> Option<location::Column> {
        Some(location::Column::IsActive)
    }
}

#[async_trait]
impl Editable for location::Entity {
    type ActiveModel = location::ActiveModel;
    type Input = LocationInput;

    fn create(input: LocationInput, _config: &AppConfig) -> location::ActiveModel {
        fill_location(location::ActiveModel::default(), input)
    }

    fn replace(model: location::Model, input: LocationInput, _config: &AppConfig) -> location::ActiveModel {
        fill_location(model.into_active_model(), input)
    }

    fn deactivate(model: location::Model) -> Option<location::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(input: &LocationInput, db: &DatabaseConnection) -> Result<(), ServiceError> {
        ensure_exists_opt::<company::Entity>(db, input.company_id).await
    }
}

fn fill_location(mut active: location::ActiveModel, input: LocationInput) -> location::ActiveModel {
    active.company_id = Set(input.company_id);
    active.name = Set(input.name);
    active.address = Set(input.address);
    active.city = Set(input.city);
    active.county = Set(input.county);
    active.contact_person = Set(input.contact_person);
    active.phone = Set(input.phone);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

impl ChildOf<company::Entity> for location::Entity {
    fn parent_column() -> location::Column {
        location::Column::CompanyId
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ProviderInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for provider::Entity {
    type Entity = Self;
    type Model = provider::Model;
    type Column = provider::Column;
    const NAME: &'static str = "provider";

    fn id_column() -> provider::Column {
        provider::Column::Id
    }

    fn search_columns() -> Vec<provider::Column> {
        vec![
            provider::Column::Name,
            provider::Column::ContactPerson,
            provider::Column::Email,
        ]
    }

    fn order_column() -> provider::Column {
        provider::Column::CreatedAt
    }

    fn active_column() -> Option<provider::Column> {
        Some(provider::Column::IsActive)
    }
}

impl Editable for provider::Entity {
    type ActiveModel = provider::ActiveModel;
    type Input = ProviderInput;

    fn create(input: ProviderInput, _config: &AppConfig) -> provider::ActiveModel {
        fill_provider(provider::ActiveModel::default(), input)
    }

    fn replace(model: provider::Model, input: ProviderInput, _config: &AppConfig) -> provider::ActiveModel {
        fill_provider(model.into_active_model(), input)
    }

    fn deactivate(model: provider::Model) -> Option<provider::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }
}

fn fill_provider(mut active: provider::ActiveModel, input: ProviderInput) -> provider::ActiveModel {
    active.name = Set(input.name);
    active.contact_person = Set(input.contact_person);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.website = Set(input.website);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct GameMixInput {
    pub provider_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub game_count: i32,
    pub is_active: Option<bool>,
}

impl Resource for game_mix::Entity {
    type Entity = Self;
    type Model = game_mix::Model;
    type Column = game_mix::Column;
    const NAME: &'static str = "game mix";

    fn id_column() -> game_mix::Column {
        game_mix::Column::Id
    }

    fn search_columns() -> Vec<game_mix::Column> {
        vec![game_mix::Column::Name, game_mix::Column::Description]
    }

    fn order_column() -> game_mix::Column {
        game_mix::Column::CreatedAt
    }

    fn active_column() -> Option<game_mix::Column> {
        Some(game_mix::Column::IsActive)
    }
}

#[async_trait]
impl Editable for game_mix::Entity {
    type ActiveModel = game_mix::ActiveModel;
    type Input = GameMixInput;

    fn create(input: GameMixInput, _config: &AppConfig) -> game_mix::ActiveModel {
        fill_game_mix(game_mix::ActiveModel::default(), input)
    }

    fn replace(model: game_mix::Model, input: GameMixInput, _config: &AppConfig) -> game_mix::ActiveModel {
        fill_game_mix(model.into_active_model(), input)
    }

    fn deactivate(model: game_mix::Model) -> Option<game_mix::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(input: &GameMixInput, db: &DatabaseConnection) -> Result<(), ServiceError> {
        ensure_exists_opt::<provider::Entity>(db, input.provider_id).await
    }
}

fn fill_game_mix(mut active: game_mix::ActiveModel, input: GameMixInput) -> game_mix::ActiveModel {
    active.provider_id = Set(input.provider_id);
    active.name = Set(input.name);
    active.description = Set(input.description);
    active.game_count = Set(input.game_count);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

impl ChildOf<provider::Entity> for game_mix::Entity {
    fn parent_column() -> game_mix::Column {
        game_mix::Column::ProviderId
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CabinetInput {
    pub provider_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub model_name: Option<String>,
    pub cabinet_type: Option<String>,
    #[serde(default = "default_equipment_status")]
    pub status: EquipmentStatus,
    pub is_active: Option<bool>,
}

fn default_equipment_status() -> EquipmentStatus {
    EquipmentStatus::Active
}

impl Resource for cabinet::Entity {
    type Entity = Self;
    type Model = cabinet::Model;
    type Column = cabinet::Column;
    const NAME: &'static str = "cabinet";

    fn id_column() -> cabinet::Column {
        cabinet::Column::Id
    }

    fn search_columns() -> Vec<cabinet::Column> {
        vec![
            cabinet::Column::Name,
            cabinet::Column::ModelName,
            cabinet::Column::CabinetType,
        ]
    }

    fn order_column() -> cabinet::Column {
        cabinet::Column::CreatedAt
    }

    fn active_column() -> Option<cabinet::Column> {
        Some(cabinet::Column::IsActive)
    }
}

#[async_trait]
impl Editable for cabinet::Entity {
    type ActiveModel = cabinet::ActiveModel;
    type Input = CabinetInput;

    fn create(input: CabinetInput, _config: &AppConfig) -> cabinet::ActiveModel {
        fill_cabinet(cabinet::ActiveModel::default(), input)
    }

    fn replace(model: cabinet::Model, input: CabinetInput, _config: &AppConfig) -> cabinet::ActiveModel {
        fill_cabinet(model.into_active_model(), input)
    }

    fn deactivate(model: cabinet::Model) -> Option<cabinet::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(input: &CabinetInput, db: &DatabaseConnection) -> Result<(), ServiceError> {
        ensure_exists_opt::<provider::Entity>(db, input.provider_id).await
    }
}

fn fill_cabinet(mut active: cabinet::ActiveModel, input: CabinetInput) -> cabinet::ActiveModel {
    active.provider_id = Set(input.provider_id);
    active.name = Set(input.name);
    active.model_name = Set(input.model_name);
    active.cabinet_type = Set(input.cabinet_type);
    active.status = Set(input.status);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SlotInput {
    #[validate(length(min = 1, max = 64))]
    pub serial_number: String,
    pub location_id: Option<Uuid>,
    pub cabinet_id: Option<Uuid>,
    pub game_mix_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    #[validate(custom = "non_negative")]
    pub denomination: Option<Decimal>,
    #[validate(custom = "non_negative")]
    pub max_bet: Option<Decimal>,
    #[validate(custom = "percent")]
    pub rtp_percent: Option<Decimal>,
    #[serde(default = "default_equipment_status")]
    pub status: EquipmentStatus,
    pub commissioned_on: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl Resource for slot::Entity {
    type Entity = Self;
    type Model = slot::Model;
    type Column = slot::Column;
    const NAME: &'static str = "slot";

    fn id_column() -> slot::Column {
        slot::Column::Id
    }

    fn search_columns() -> Vec<slot::Column> {
        vec![slot::Column::SerialNumber]
    }

    fn order_column() -> slot::Column {
        slot::Column::CreatedAt
    }

    fn active_column() -> Option<slot::Column> {
        Some(slot::Column::IsActive)
    }
}

#[async_trait]
impl Editable for slot::Entity {
    type ActiveModel = slot::ActiveModel;
    type Input = SlotInput;

    fn create(input: SlotInput, _config: &AppConfig) -> slot::ActiveModel {
        fill_slot(slot::ActiveModel::default(), input)
    }

    fn replace(model: slot::Model, input: SlotInput, _config: &AppConfig) -> slot::ActiveModel {
        fill_slot(model.into_active_model(), input)
    }

    fn deactivate(model: slot::Model) -> Option<slot::ActiveModel> {
        let mut active = model.into_active_model();
        active.is_active = Set(false);
        Some(active)
    }

    async fn check_references(input: &SlotInput, db: &DatabaseConnection) -> Result<(), ServiceError> {
        ensure_exists_opt::<location::Entity>(db, input.location_id).await?;
        ensure_exists_opt::<cabinet::Entity>(db, input.cabinet_id).await?;
        ensure_exists_opt::<game_mix::Entity>(db, input.game_mix_id).await?;
        ensure_exists_opt::<provider::Entity>(db, input.provider_id).await
    }
}

fn fill_slot(mut active: slot::ActiveModel, input: SlotInput) -> slot::ActiveModel {
    active.serial_number = Set(input.serial_number);
    active.location_id = Set(input.location_id);
    active.cabinet_id = Set(input.cabinet_id);
    active.game_mix_id = Set(input.game_mix_id);
    active.provider_id = Set(input.provider_id);
    active.denomination = Set(input.denomination);
    active.max_bet = Set(input.max_bet);
    active.rtp_percent = Set(input.rtp_percent);
    active.status = Set(input.status);
    active.commissioned_on = Set(input.commissioned_on);
    active.is_active = Set(input.is_active.unwrap_or(true));
    active
}

impl ChildOf<location::Entity> for slot::Entity {
    fn parent_column() -> slot::Column {
        slot::Column::LocationId
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn slot_input() -> SlotInput {
        SlotInput {
            serial_number: "EGT-0001".into(),
            location_id: None,
            cabinet_id: None,
            game_mix_id: None,
            provider_id: None,
            denomination: Some(dec!(0.01)),
            max_bet: Some(dec!(50)),
            rtp_percent: Some(dec!(96.5)),
            status: EquipmentStatus::Active,
            commissioned_on: None,
            is_active: None,
        }
    }

    #[test]
    fn slot_input_rules() {
        assert!(slot_input().validate().is_ok());

        let mut bad = slot_input();
        bad.serial_number = String::new();
        bad.rtp_percent = Some(dec!(104));
        bad.max_bet = Some(dec!(-5));
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("serial_number"));
        assert!(fields.contains_key("rtp_percent"));
        assert!(fields.contains_key("max_bet"));
    }

    #[test]
    fn company_requires_valid_email() {
        let input: CompanyInput = serde_json::from_value(serde_json::json!({
            "name": "Nova Gaming SRL",
            "registration_number": "J40/1234/2019",
            "email": "not-an-email"
        }))
        .unwrap();
        assert!(input.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn equipment_status_defaults_to_active() {
        let input: CabinetInput =
            serde_json::from_value(serde_json::json!({ "name": "Gaminator" })).unwrap();
        assert_eq!(input.status, EquipmentStatus::Active);
    }
}
