//! sea-orm entities, one module per table.

/// Stamps `id` on first insert and maintains `created_at` / `updated_at`.
macro_rules! timestamped_active_model {
    () => {
        #[async_trait::async_trait]
        impl sea_orm::ActiveModelBehavior for ActiveModel {
            async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, sea_orm::DbErr>
            where
                C: sea_orm::ConnectionTrait,
            {
                let mut active_model = self;
                let now = chrono::Utc::now();

                if insert {
                    if active_model.id.is_not_set() {
                        active_model.id = sea_orm::ActiveValue::Set(uuid::Uuid::new_v4());
                    }
                    active_model.created_at = sea_orm::ActiveValue::Set(now);
                }
                active_model.updated_at = sea_orm::ActiveValue::Set(now);

                Ok(active_model)
            }
        }
    };
}

pub mod enums;

pub mod company;
pub mod location;
pub mod provider;
pub mod game_mix;
pub mod cabinet;
pub mod slot;

pub mod invoice;
pub mod legal_document;
pub mod onjn_report;
pub mod rent_agreement;

pub mod automated_bill;
pub mod billing_plan;
pub mod location_billing;
pub mod payment_history;
pub mod revenue_report;

pub use enums::{
    BillStatus, BillingFrequency, EquipmentStatus, InvoiceStatus, OnjnReportStatus, PaymentMethod,
    PlanType,
};
