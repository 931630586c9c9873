//! Automated billing: prices verified revenue reports against the location's
//! billing plan, issues bills and tracks their payments.

pub mod calculator;
pub mod period;

pub use calculator::{calculate, round_money, BillBreakdown, BillingTerms, CalculationError};
pub use period::{due_date, period_containing, BillingPeriod};

use crate::config::AppConfig;
use crate::dto::{billing::PaymentInput, MAX_MONEY};
use crate::entities::{
    automated_bill, billing_plan, location, location_billing, payment_history, revenue_report,
    BillStatus, BillingFrequency,
};
use crate::errors::ServiceError;
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillingPreview {
    pub location_billing_id: Uuid,
    pub currency: String,
    pub terms: BillingTerms,
    pub breakdown: BillBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PeriodInfo {
    pub location_billing_id: Uuid,
    pub billing_frequency: BillingFrequency,
    pub period: BillingPeriod,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkippedReport {
    pub revenue_report_id: Uuid,
    pub location_billing_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillingRunSummary {
    pub as_of: NaiveDate,
    pub generated: Vec<Uuid>,
    pub skipped: Vec<SkippedReport>,
    pub overdue_marked: u64,
}

/// Money position of one location across its non-cancelled bills
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillSummary {
    pub location_id: Uuid,
    pub bill_count: u64,
    pub overdue_count: u64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentReceipt {
    pub bill: automated_bill::Model,
    pub payment: payment_history::Model,
}

#[derive(Clone)]
pub struct BillingService {
    db: Arc<DatabaseConnection>,
    config: Arc<AppConfig>,
}

impl BillingService {
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Prices `revenue` for an assignment without persisting anything
    #[instrument(skip(self))]
    pub async fn preview(
        &self,
        location_billing_id: Uuid,
        revenue: Decimal,
    ) -> Result<BillingPreview, ServiceError> {
        let (assignment, plan) = load_assignment(&*self.db, location_billing_id).await?;
        let terms = BillingTerms::resolve(&plan, &assignment);
        let breakdown = calculate(&terms, revenue)?;

        Ok(BillingPreview {
            location_billing_id,
            currency: plan.currency,
            terms,
            breakdown,
        })
    }

    /// Billing period of an assignment that contains `date`
    pub async fn period_for(
        &self,
        location_billing_id: Uuid,
        date: NaiveDate,
    ) -> Result<PeriodInfo, ServiceError> {
        let (assignment, plan) = load_assignment(&*self.db, location_billing_id).await?;
        let period = period_containing(plan.billing_frequency, assignment.start_date, date)
            .ok_or_else(|| {
                ServiceError::BadRequest(format!(
                    "{} precedes the billing start date {}",
                    date, assignment.start_date
                ))
            })?;

        Ok(PeriodInfo {
            location_billing_id,
            billing_frequency: plan.billing_frequency,
            period,
            due_date: plan_due_date(&plan, period.end)?,
        })
    }

    /// Marks a revenue report as verified; a report is verified at most once
    #[instrument(skip(self))]
    pub async fn verify_revenue_report(
        &self,
        id: Uuid,
    ) -> Result<revenue_report::Model, ServiceError> {
        let now = Utc::now();
        let result = revenue_report::Entity::update_many()
            .col_expr(revenue_report::Column::IsVerified, Expr::value(true))
            .col_expr(revenue_report::Column::VerifiedAt, Expr::value(Some(now)))
            .col_expr(revenue_report::Column::UpdatedAt, Expr::value(now))
            .filter(revenue_report::Column::Id.eq(id))
            .filter(revenue_report::Column::IsVerified.eq(false))
            .exec(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let report = revenue_report::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("revenue report", id))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "revenue report {} is already verified",
                id
            )));
        }

        info!(revenue_report_id = %id, "revenue report verified");
        Ok(report)
    }

    /// Issues the bill for one verified revenue report
    #[instrument(skip(self))]
    pub async fn generate_bill(
        &self,
        location_billing_id: Uuid,
        revenue_report_id: Uuid,
    ) -> Result<automated_bill::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let bill = self
            .generate_in(&txn, location_billing_id, revenue_report_id)
            .await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("slotfleet_billing.bills_generated", 1);
        info!(
            bill_id = %bill.id,
            bill_number = %bill.bill_number,
            total = %bill.total_amount,
            "bill generated"
        );
        Ok(bill)
    }

    async fn generate_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        location_billing_id: Uuid,
        revenue_report_id: Uuid,
    ) -> Result<automated_bill::Model, ServiceError> {
        // Row lock held until commit; serializes bill generation per assignment
        let assignment = location_billing::Entity::find_by_id(location_billing_id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("location billing", location_billing_id))?;
        let plan = load_plan(conn, assignment.billing_plan_id).await?;
        if !assignment.is_active {
            return Err(ServiceError::InvalidOperation(format!(
                "location billing {} is inactive",
                assignment.id
            )));
        }
        if !plan.is_active {
            return Err(ServiceError::InvalidOperation(format!(
                "billing plan {} is inactive",
                plan.id
            )));
        }

        let report = revenue_report::Entity::find_by_id(revenue_report_id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("revenue report", revenue_report_id))?;

        if report.location_id != assignment.location_id {
            return Err(ServiceError::InvalidOperation(format!(
                "revenue report {} belongs to another location",
                report.id
            )));
        }
        if !report.is_verified {
            return Err(ServiceError::InvalidOperation(format!(
                "revenue report {} is not verified",
                report.id
            )));
        }
        if !assignment.covers(report.period_start, report.period_end) {
            return Err(ServiceError::InvalidOperation(format!(
                "report period {}..{} is outside the billing window",
                report.period_start, report.period_end
            )));
        }
        let within_one_period =
            period_containing(plan.billing_frequency, assignment.start_date, report.period_start)
                .map_or(false, |period| period.contains(report.period_end));
        if !within_one_period {
            return Err(ServiceError::InvalidOperation(format!(
                "report period {}..{} spans more than one {} billing period",
                report.period_start, report.period_end, plan.billing_frequency
            )));
        }

        let overlapping = automated_bill::Entity::find()
            .filter(automated_bill::Column::LocationBillingId.eq(assignment.id))
            .filter(automated_bill::Column::Status.ne(BillStatus::Cancelled))
            .filter(automated_bill::Column::PeriodStart.lte(report.period_end))
            .filter(automated_bill::Column::PeriodEnd.gte(report.period_start))
            .count(conn)
            .await
            .map_err(ServiceError::db_error)?;
        if overlapping > 0 {
            return Err(ServiceError::Conflict(format!(
                "a bill already exists for {}..{}",
                report.period_start, report.period_end
            )));
        }

        let terms = BillingTerms::resolve(&plan, &assignment);
        let breakdown = calculate(&terms, round_money(report.net_revenue))?;
        if breakdown.total > MAX_MONEY {
            return Err(ServiceError::InvalidOperation(format!(
                "bill total {} exceeds the largest storable amount",
                breakdown.total
            )));
        }
        let due = plan_due_date(&plan, report.period_end)?;

        let (status, paid_at) = if breakdown.total.is_zero() {
            (BillStatus::Paid, Some(Utc::now()))
        } else {
            (BillStatus::Pending, None)
        };

        let bill = automated_bill::ActiveModel {
            bill_number: Set(self.bill_number(report.period_end)),
            location_billing_id: Set(assignment.id),
            revenue_report_id: Set(Some(report.id)),
            location_id: Set(assignment.location_id),
            period_start: Set(report.period_start),
            period_end: Set(report.period_end),
            revenue_basis: Set(breakdown.revenue_basis),
            base_rent_amount: Set(breakdown.base_rent),
            revenue_share_amount: Set(breakdown.revenue_share),
            minimum_guarantee_adjustment: Set(breakdown.minimum_guarantee_adjustment),
            total_amount: Set(breakdown.total),
            amount_paid: Set(Decimal::ZERO),
            currency: Set(plan.currency.clone()),
            status: Set(status),
            due_date: Set(due),
            paid_at: Set(paid_at),
            ..Default::default()
        };

        bill.insert(conn).await.map_err(ServiceError::db_error)
    }

    /// `<prefix>-<YYYYMM>-<8 hex>`
    fn bill_number(&self, period_end: NaiveDate) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}-{}",
            self.config.bill_number_prefix,
            period_end.format("%Y%m"),
            suffix[..8].to_uppercase()
        )
    }

    /// Bills every verified, unbilled report that closed on or before `as_of`,
    /// then flags overdue bills. Failures are reported per report.
    #[instrument(skip(self))]
    pub async fn run_billing(&self, as_of: NaiveDate) -> Result<BillingRunSummary, ServiceError> {
        let assignments = location_billing::Entity::find()
            .filter(location_billing::Column::IsActive.eq(true))
            .order_by_asc(location_billing::Column::StartDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut generated = Vec::new();
        let mut skipped = Vec::new();

        for assignment in assignments {
            let mut window = Condition::all()
                .add(revenue_report::Column::LocationId.eq(assignment.location_id))
                .add(revenue_report::Column::IsVerified.eq(true))
                .add(revenue_report::Column::PeriodEnd.lte(as_of))
                .add(revenue_report::Column::PeriodStart.gte(assignment.start_date));
            if let Some(end) = assignment.end_date {
                window = window.add(revenue_report::Column::PeriodEnd.lte(end));
            }

            let reports = revenue_report::Entity::find()
                .filter(window)
                .order_by_asc(revenue_report::Column::PeriodStart)
                .all(&*self.db)
                .await
                .map_err(ServiceError::db_error)?;
            if reports.is_empty() {
                continue;
            }

            let billed: HashSet<Uuid> = automated_bill::Entity::find()
                .filter(
                    automated_bill::Column::RevenueReportId
                        .is_in(reports.iter().map(|r| r.id).collect::<Vec<_>>()),
                )
                .filter(automated_bill::Column::Status.ne(BillStatus::Cancelled))
                .all(&*self.db)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .filter_map(|bill| bill.revenue_report_id)
                .collect();

            for report in reports.into_iter().filter(|r| !billed.contains(&r.id)) {
                match self.generate_bill(assignment.id, report.id).await {
                    Ok(bill) => generated.push(bill.id),
                    Err(err) => {
                        warn!(
                            revenue_report_id = %report.id,
                            location_billing_id = %assignment.id,
                            error = %err,
                            "revenue report skipped"
                        );
                        skipped.push(SkippedReport {
                            revenue_report_id: report.id,
                            location_billing_id: assignment.id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        let overdue_marked = self.mark_overdue(as_of).await?;

        info!(
            %as_of,
            generated = generated.len(),
            skipped = skipped.len(),
            overdue_marked,
            "billing run finished"
        );
        Ok(BillingRunSummary {
            as_of,
            generated,
            skipped,
            overdue_marked,
        })
    }

    /// Open bills whose due date is before `as_of` become overdue
    pub async fn mark_overdue(&self, as_of: NaiveDate) -> Result<u64, ServiceError> {
        let result = automated_bill::Entity::update_many()
            .col_expr(automated_bill::Column::Status, Expr::value(BillStatus::Overdue))
            .col_expr(automated_bill::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(
                automated_bill::Column::Status
                    .is_in([BillStatus::Pending, BillStatus::PartiallyPaid]),
            )
            .filter(automated_bill::Column::DueDate.lt(as_of))
            .exec(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        if result.rows_affected > 0 {
            counter!("slotfleet_billing.bills_marked_overdue", result.rows_affected);
            info!(count = result.rows_affected, %as_of, "bills marked overdue");
        }
        Ok(result.rows_affected)
    }

    /// Records a payment and moves the bill to `partially_paid` or `paid`
    #[instrument(skip(self, input), fields(amount = %input.amount))]
    pub async fn record_payment(
        &self,
        bill_id: Uuid,
        input: PaymentInput,
    ) -> Result<PaymentReceipt, ServiceError> {
        input.validate()?;
        let amount = round_money(input.amount);

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let bill = automated_bill::Entity::find_by_id(bill_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("automated bill", bill_id))?;

        match bill.status {
            BillStatus::Cancelled => {
                return Err(ServiceError::InvalidOperation(format!(
                    "bill {} is cancelled",
                    bill.bill_number
                )))
            }
            BillStatus::Paid => {
                return Err(ServiceError::InvalidOperation(format!(
                    "bill {} is already paid",
                    bill.bill_number
                )))
            }
            _ => {}
        }

        let total = round_money(bill.total_amount);
        let paid = round_money(bill.amount_paid) + amount;
        if paid > total {
            return Err(ServiceError::BadRequest(format!(
                "payment of {} exceeds the outstanding {} on bill {}",
                amount,
                total - round_money(bill.amount_paid),
                bill.bill_number
            )));
        }

        let payment = payment_history::ActiveModel {
            automated_bill_id: Set(bill.id),
            amount: Set(amount),
            paid_on: Set(input.paid_on),
            payment_method: Set(input.payment_method),
            reference: Set(input.reference),
            notes: Set(input.notes),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut active = bill.into_active_model();
        active.amount_paid = Set(paid);
        if paid == total {
            active.status = Set(BillStatus::Paid);
            active.paid_at = Set(Some(Utc::now()));
        } else {
            active.status = Set(BillStatus::PartiallyPaid);
        }
        let bill = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("slotfleet_billing.payments_recorded", 1);
        info!(bill_id = %bill.id, status = %bill.status, "payment recorded");
        Ok(PaymentReceipt { bill, payment })
    }

    /// Cancels a bill that has not received any payment
    #[instrument(skip(self))]
    pub async fn cancel_bill(&self, bill_id: Uuid) -> Result<automated_bill::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let bill = automated_bill::Entity::find_by_id(bill_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("automated bill", bill_id))?;

        if matches!(bill.status, BillStatus::Paid | BillStatus::Cancelled) {
            return Err(ServiceError::InvalidOperation(format!(
                "bill {} is {} and cannot be cancelled",
                bill.bill_number, bill.status
            )));
        }

        let payments = payment_history::Entity::find()
            .filter(payment_history::Column::AutomatedBillId.eq(bill.id))
            .count(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if payments > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "bill {} has {} payment(s) and cannot be cancelled",
                bill.bill_number, payments
            )));
        }

        let mut active = bill.into_active_model();
        active.status = Set(BillStatus::Cancelled);
        let bill = active.update(&txn).await.map_err(ServiceError::db_error)?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(bill_id = %bill.id, "bill cancelled");
        Ok(bill)
    }

    pub async fn bill_summary(&self, location_id: Uuid) -> Result<BillSummary, ServiceError> {
        location::Entity::find_by_id(location_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("location", location_id))?;

        let bills = automated_bill::Entity::find()
            .filter(automated_bill::Column::LocationId.eq(location_id))
            .filter(automated_bill::Column::Status.ne(BillStatus::Cancelled))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut summary = BillSummary {
            location_id,
            bill_count: 0,
            overdue_count: 0,
            total_billed: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            outstanding: Decimal::ZERO,
        };
        for bill in &bills {
            summary.bill_count += 1;
            if bill.status == BillStatus::Overdue {
                summary.overdue_count += 1;
            }
            summary.total_billed += round_money(bill.total_amount);
            summary.total_paid += round_money(bill.amount_paid);
            summary.outstanding += round_money(bill.outstanding());
        }
        Ok(summary)
    }
}

async fn load_assignment<C: ConnectionTrait>(
    conn: &C,
    location_billing_id: Uuid,
) -> Result<(location_billing::Model, billing_plan::Model), ServiceError> {
    let assignment = location_billing::Entity::find_by_id(location_billing_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("location billing", location_billing_id))?;
    let plan = load_plan(conn, assignment.billing_plan_id).await?;

    Ok((assignment, plan))
}

async fn load_plan<C: ConnectionTrait>(
    conn: &C,
    billing_plan_id: Uuid,
) -> Result<billing_plan::Model, ServiceError> {
    billing_plan::Entity::find_by_id(billing_plan_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("billing plan", billing_plan_id))
}

fn plan_due_date(plan: &billing_plan::Model, period_end: NaiveDate) -> Result<NaiveDate, ServiceError> {
    let terms = u32::try_from(plan.payment_terms_days).unwrap_or(0);
    due_date(period_end, terms)
        .ok_or_else(|| ServiceError::InternalError(format!("due date overflow after {period_end}")))
}
