use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_fleet_tables::Migration),
            Box::new(m20240301_000002_create_document_tables::Migration),
            Box::new(m20240301_000003_create_billing_tables::Migration),
        ]
    }
}

mod m20240301_000001_create_fleet_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_fleet_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Companies::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Companies::Name).string().not_null())
                        .col(
                            ColumnDef::new(Companies::RegistrationNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Companies::TaxId).string().null())
                        .col(
                            ColumnDef::new(Companies::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Companies::Phone).string().null())
                        .col(ColumnDef::new(Companies::Address).string().null())
                        .col(ColumnDef::new(Companies::ContactPerson).string().null())
                        .col(
                            ColumnDef::new(Companies::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Companies::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Companies::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Providers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Providers::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Providers::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Providers::ContactPerson).string().null())
                        .col(ColumnDef::new(Providers::Email).string().null())
                        .col(ColumnDef::new(Providers::Phone).string().null())
                        .col(ColumnDef::new(Providers::Website).string().null())
                        .col(
                            ColumnDef::new(Providers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Providers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Providers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Locations::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Locations::CompanyId).uuid().null())
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(ColumnDef::new(Locations::Address).string().null())
                        .col(ColumnDef::new(Locations::City).string().null())
                        .col(ColumnDef::new(Locations::County).string().null())
                        .col(ColumnDef::new(Locations::ContactPerson).string().null())
                        .col(ColumnDef::new(Locations::Phone).string().null())
                        .col(
                            ColumnDef::new(Locations::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Locations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_locations_company")
                                .from(Locations::Table, Locations::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_company_id")
                        .table(Locations::Table)
                        .col(Locations::CompanyId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GameMixes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(GameMixes::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(GameMixes::ProviderId).uuid().null())
                        .col(ColumnDef::new(GameMixes::Name).string().not_null())
                        .col(ColumnDef::new(GameMixes::Description).text().null())
                        .col(
                            ColumnDef::new(GameMixes::GameCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(GameMixes::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(GameMixes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GameMixes::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_game_mixes_provider")
                                .from(GameMixes::Table, GameMixes::ProviderId)
                                .to(Providers::Table, Providers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Cabinets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Cabinets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Cabinets::ProviderId).uuid().null())
                        .col(ColumnDef::new(Cabinets::Name).string().not_null())
                        .col(ColumnDef::new(Cabinets::ModelName).string().null())
                        .col(ColumnDef::new(Cabinets::CabinetType).string().null())
                        .col(ColumnDef::new(Cabinets::Status).string().not_null())
                        .col(
                            ColumnDef::new(Cabinets::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Cabinets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Cabinets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cabinets_provider")
                                .from(Cabinets::Table, Cabinets::ProviderId)
                                .to(Providers::Table, Providers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Slots::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Slots::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Slots::SerialNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Slots::LocationId).uuid().null())
                        .col(ColumnDef::new(Slots::CabinetId).uuid().null())
                        .col(ColumnDef::new(Slots::GameMixId).uuid().null())
                        .col(ColumnDef::new(Slots::ProviderId).uuid().null())
                        .col(ColumnDef::new(Slots::Denomination).decimal_len(14, 2).null())
                        .col(ColumnDef::new(Slots::MaxBet).decimal_len(14, 2).null())
                        .col(ColumnDef::new(Slots::RtpPercent).decimal_len(7, 4).null())
                        .col(ColumnDef::new(Slots::Status).string().not_null())
                        .col(ColumnDef::new(Slots::CommissionedOn).date().null())
                        .col(
                            ColumnDef::new(Slots::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Slots::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Slots::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_slots_location")
                                .from(Slots::Table, Slots::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_slots_cabinet")
                                .from(Slots::Table, Slots::CabinetId)
                                .to(Cabinets::Table, Cabinets::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_slots_game_mix")
                                .from(Slots::Table, Slots::GameMixId)
                                .to(GameMixes::Table, GameMixes::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_slots_provider")
                                .from(Slots::Table, Slots::ProviderId)
                                .to(Providers::Table, Providers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_slots_location_id")
                        .table(Slots::Table)
                        .col(Slots::LocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Slots::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Cabinets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GameMixes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Providers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Companies {
        Table,
        Id,
        Name,
        RegistrationNumber,
        TaxId,
        Email,
        Phone,
        Address,
        ContactPerson,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Providers {
        Table,
        Id,
        Name,
        ContactPerson,
        Email,
        Phone,
        Website,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Id,
        CompanyId,
        Name,
        Address,
        City,
        County,
        ContactPerson,
        Phone,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum GameMixes {
        Table,
        Id,
        ProviderId,
        Name,
        Description,
        GameCount,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Cabinets {
        Table,
        Id,
        ProviderId,
        Name,
        ModelName,
        CabinetType,
        Status,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Slots {
        Table,
        Id,
        SerialNumber,
        LocationId,
        CabinetId,
        GameMixId,
        ProviderId,
        Denomination,
        MaxBet,
        RtpPercent,
        Status,
        CommissionedOn,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_document_tables {
    use super::m20240301_000001_create_fleet_tables::{Companies, Locations};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_document_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::CompanyId).uuid().not_null())
                        .col(ColumnDef::new(Invoices::LocationId).uuid().null())
                        .col(ColumnDef::new(Invoices::IssueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::DueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::Amount).decimal_len(14, 2).not_null())
                        .col(ColumnDef::new(Invoices::Currency).string_len(3).not_null())
                        .col(ColumnDef::new(Invoices::Status).string().not_null())
                        .col(ColumnDef::new(Invoices::Notes).text().null())
                        .col(
                            ColumnDef::new(Invoices::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_company")
                                .from(Invoices::Table, Invoices::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_location")
                                .from(Invoices::Table, Invoices::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RentAgreements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RentAgreements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RentAgreements::AgreementNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(RentAgreements::CompanyId).uuid().not_null())
                        .col(ColumnDef::new(RentAgreements::LocationId).uuid().null())
                        .col(ColumnDef::new(RentAgreements::StartDate).date().not_null())
                        .col(ColumnDef::new(RentAgreements::EndDate).date().null())
                        .col(
                            ColumnDef::new(RentAgreements::MonthlyRent)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RentAgreements::Currency)
                                .string_len(3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(RentAgreements::Terms).text().null())
                        .col(
                            ColumnDef::new(RentAgreements::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(RentAgreements::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RentAgreements::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rent_agreements_company")
                                .from(RentAgreements::Table, RentAgreements::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rent_agreements_location")
                                .from(RentAgreements::Table, RentAgreements::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(LegalDocuments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LegalDocuments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LegalDocuments::Title).string().not_null())
                        .col(
                            ColumnDef::new(LegalDocuments::DocumentType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LegalDocuments::ReferenceNumber)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(LegalDocuments::CompanyId).uuid().null())
                        .col(ColumnDef::new(LegalDocuments::LocationId).uuid().null())
                        .col(ColumnDef::new(LegalDocuments::IssuedOn).date().not_null())
                        .col(ColumnDef::new(LegalDocuments::ExpiresOn).date().null())
                        .col(ColumnDef::new(LegalDocuments::Notes).text().null())
                        .col(
                            ColumnDef::new(LegalDocuments::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(LegalDocuments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LegalDocuments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_legal_documents_company")
                                .from(LegalDocuments::Table, LegalDocuments::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_legal_documents_location")
                                .from(LegalDocuments::Table, LegalDocuments::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OnjnReports::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OnjnReports::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(OnjnReports::ReportNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(OnjnReports::CompanyId).uuid().not_null())
                        .col(ColumnDef::new(OnjnReports::LocationId).uuid().null())
                        .col(ColumnDef::new(OnjnReports::ReportType).string().not_null())
                        .col(ColumnDef::new(OnjnReports::PeriodStart).date().not_null())
                        .col(ColumnDef::new(OnjnReports::PeriodEnd).date().not_null())
                        .col(ColumnDef::new(OnjnReports::Status).string().not_null())
                        .col(
                            ColumnDef::new(OnjnReports::SubmittedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(OnjnReports::Notes).text().null())
                        .col(
                            ColumnDef::new(OnjnReports::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(OnjnReports::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OnjnReports::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_onjn_reports_company")
                                .from(OnjnReports::Table, OnjnReports::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_onjn_reports_location")
                                .from(OnjnReports::Table, OnjnReports::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OnjnReports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(LegalDocuments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RentAgreements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        InvoiceNumber,
        CompanyId,
        LocationId,
        IssueDate,
        DueDate,
        Amount,
        Currency,
        Status,
        Notes,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RentAgreements {
        Table,
        Id,
        AgreementNumber,
        CompanyId,
        LocationId,
        StartDate,
        EndDate,
        MonthlyRent,
        Currency,
        Terms,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum LegalDocuments {
        Table,
        Id,
        Title,
        DocumentType,
        ReferenceNumber,
        CompanyId,
        LocationId,
        IssuedOn,
        ExpiresOn,
        Notes,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum OnjnReports {
        Table,
        Id,
        ReportNumber,
        CompanyId,
        LocationId,
        ReportType,
        PeriodStart,
        PeriodEnd,
        Status,
        SubmittedAt,
        Notes,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000003_create_billing_tables {
    use super::m20240301_000001_create_fleet_tables::Locations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_billing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BillingPlans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BillingPlans::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(BillingPlans::PlanType).string().not_null())
                        .col(
                            ColumnDef::new(BillingPlans::BaseRentAmount)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::RevenueSharePercent)
                                .decimal_len(7, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::MinimumGuarantee)
                                .decimal_len(14, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::Currency)
                                .string_len(3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::BillingFrequency)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::PaymentTermsDays)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BillingPlans::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(LocationBillings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LocationBillings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LocationBillings::LocationId).uuid().not_null())
                        .col(
                            ColumnDef::new(LocationBillings::BillingPlanId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LocationBillings::StartDate).date().not_null())
                        .col(ColumnDef::new(LocationBillings::EndDate).date().null())
                        .col(
                            ColumnDef::new(LocationBillings::BaseRentOverride)
                                .decimal_len(14, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(LocationBillings::RevenueShareOverride)
                                .decimal_len(7, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(LocationBillings::MinimumGuaranteeOverride)
                                .decimal_len(14, 2)
                                .null(),
                        )
                        .col(ColumnDef::new(LocationBillings::Notes).text().null())
                        .col(
                            ColumnDef::new(LocationBillings::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(LocationBillings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LocationBillings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_location_billings_location")
                                .from(LocationBillings::Table, LocationBillings::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_location_billings_plan")
                                .from(LocationBillings::Table, LocationBillings::BillingPlanId)
                                .to(BillingPlans::Table, BillingPlans::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RevenueReports::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RevenueReports::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RevenueReports::LocationId).uuid().not_null())
                        .col(ColumnDef::new(RevenueReports::PeriodStart).date().not_null())
                        .col(ColumnDef::new(RevenueReports::PeriodEnd).date().not_null())
                        .col(
                            ColumnDef::new(RevenueReports::GrossRevenue)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RevenueReports::Payouts)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RevenueReports::NetRevenue)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RevenueReports::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(RevenueReports::VerifiedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(RevenueReports::Notes).text().null())
                        .col(
                            ColumnDef::new(RevenueReports::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RevenueReports::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_revenue_reports_location")
                                .from(RevenueReports::Table, RevenueReports::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_revenue_reports_location_period")
                        .table(RevenueReports::Table)
                        .col(RevenueReports::LocationId)
                        .col(RevenueReports::PeriodEnd)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AutomatedBills::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AutomatedBills::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::BillNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::LocationBillingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AutomatedBills::RevenueReportId).uuid().null())
                        .col(ColumnDef::new(AutomatedBills::LocationId).uuid().not_null())
                        .col(ColumnDef::new(AutomatedBills::PeriodStart).date().not_null())
                        .col(ColumnDef::new(AutomatedBills::PeriodEnd).date().not_null())
                        .col(
                            ColumnDef::new(AutomatedBills::RevenueBasis)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::BaseRentAmount)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::RevenueShareAmount)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::MinimumGuaranteeAdjustment)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::TotalAmount)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::AmountPaid)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::Currency)
                                .string_len(3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(AutomatedBills::Status).string().not_null())
                        .col(ColumnDef::new(AutomatedBills::DueDate).date().not_null())
                        .col(
                            ColumnDef::new(AutomatedBills::PaidAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AutomatedBills::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_automated_bills_location_billing")
                                .from(AutomatedBills::Table, AutomatedBills::LocationBillingId)
                                .to(LocationBillings::Table, LocationBillings::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_automated_bills_revenue_report")
                                .from(AutomatedBills::Table, AutomatedBills::RevenueReportId)
                                .to(RevenueReports::Table, RevenueReports::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_automated_bills_location")
                                .from(AutomatedBills::Table, AutomatedBills::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_automated_bills_billing_period")
                        .table(AutomatedBills::Table)
                        .col(AutomatedBills::LocationBillingId)
                        .col(AutomatedBills::PeriodStart)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_automated_bills_status_due")
                        .table(AutomatedBills::Table)
                        .col(AutomatedBills::Status)
                        .col(AutomatedBills::DueDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentHistory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentHistory::AutomatedBillId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentHistory::Amount)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentHistory::PaidOn).date().not_null())
                        .col(
                            ColumnDef::new(PaymentHistory::PaymentMethod)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentHistory::Reference).string().null())
                        .col(ColumnDef::new(PaymentHistory::Notes).text().null())
                        .col(
                            ColumnDef::new(PaymentHistory::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentHistory::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payment_history_bill")
                                .from(PaymentHistory::Table, PaymentHistory::AutomatedBillId)
                                .to(AutomatedBills::Table, AutomatedBills::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payment_history_bill_id")
                        .table(PaymentHistory::Table)
                        .col(PaymentHistory::AutomatedBillId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentHistory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AutomatedBills::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RevenueReports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(LocationBillings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BillingPlans::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BillingPlans {
        Table,
        Id,
        Name,
        PlanType,
        BaseRentAmount,
        RevenueSharePercent,
        MinimumGuarantee,
        Currency,
        BillingFrequency,
        PaymentTermsDays,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum LocationBillings {
        Table,
        Id,
        LocationId,
        BillingPlanId,
        StartDate,
        EndDate,
        BaseRentOverride,
        RevenueShareOverride,
        MinimumGuaranteeOverride,
        Notes,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RevenueReports {
        Table,
        Id,
        LocationId,
        PeriodStart,
        PeriodEnd,
        GrossRevenue,
        Payouts,
        NetRevenue,
        IsVerified,
        VerifiedAt,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum AutomatedBills {
        Table,
        Id,
        BillNumber,
        LocationBillingId,
        RevenueReportId,
        LocationId,
        PeriodStart,
        PeriodEnd,
        RevenueBasis,
        BaseRentAmount,
        RevenueShareAmount,
        MinimumGuaranteeAdjustment,
        TotalAmount,
        AmountPaid,
        Currency,
        Status,
        DueDate,
        PaidAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PaymentHistory {
        Table,
        Id,
        AutomatedBillId,
        Amount,
        PaidOn,
        PaymentMethod,
        Reference,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

/// Connects to `db_url` and applies every pending migration
pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(2)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");

    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}
