//! Billing period arithmetic, anchored on a location billing's start date.

use crate::entities::BillingFrequency;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

impl BillingFrequency {
    pub fn months(self) -> u32 {
        match self {
            BillingFrequency::Monthly => 1,
            BillingFrequency::Quarterly => 3,
            BillingFrequency::Yearly => 12,
        }
    }
}

/// Inclusive date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Anchor shifted by `months`, clamped to the last day of shorter months.
///
/// Offsets are always taken from the anchor so that a 31st anchor does not
/// drift to the 28th after February.
fn shift(anchor: NaiveDate, months: u32) -> Option<NaiveDate> {
    anchor.checked_add_months(Months::new(months))
}

/// The period aligned to `anchor` that contains `date`; `None` before the anchor
pub fn period_containing(
    frequency: BillingFrequency,
    anchor: NaiveDate,
    date: NaiveDate,
) -> Option<BillingPeriod> {
    if date < anchor {
        return None;
    }

    let span = frequency.months();
    let elapsed = (i64::from(date.year()) - i64::from(anchor.year())) * 12
        + (date.month0() as i64 - anchor.month0() as i64);
    let mut offset = u32::try_from(elapsed).ok()? / span * span;

    loop {
        let start = shift(anchor, offset)?;
        if start > date {
            offset = offset.checked_sub(span)?;
            continue;
        }
        let end = shift(anchor, offset + span)?.checked_sub_days(Days::new(1))?;
        if date > end {
            offset += span;
            continue;
        }
        return Some(BillingPeriod { start, end });
    }
}

pub fn due_date(period_end: NaiveDate, payment_terms_days: u32) -> Option<NaiveDate> {
    period_end.checked_add_days(Days::new(u64::from(payment_terms_days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case::first_month(BillingFrequency::Monthly, d(2024, 1, 1), d(2024, 1, 17), d(2024, 1, 1), d(2024, 1, 31))]
    #[case::mid_month_anchor(BillingFrequency::Monthly, d(2024, 1, 15), d(2024, 3, 2), d(2024, 2, 15), d(2024, 3, 14))]
    #[case::quarter(BillingFrequency::Quarterly, d(2024, 1, 1), d(2024, 5, 20), d(2024, 4, 1), d(2024, 6, 30))]
    #[case::year(BillingFrequency::Yearly, d(2023, 7, 1), d(2024, 6, 30), d(2023, 7, 1), d(2024, 6, 30))]
    #[case::anchor_on_31st(BillingFrequency::Monthly, d(2024, 1, 31), d(2024, 3, 30), d(2024, 2, 29), d(2024, 3, 30))]
    fn finds_containing_period(
        #[case] frequency: BillingFrequency,
        #[case] anchor: NaiveDate,
        #[case] date: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        let period = period_containing(frequency, anchor, date).unwrap();
        assert_eq!(period, BillingPeriod { start, end });
        assert!(period.contains(date));
    }

    #[test]
    fn nothing_before_anchor() {
        assert!(period_containing(BillingFrequency::Monthly, d(2024, 2, 1), d(2024, 1, 31)).is_none());
    }

    #[test]
    fn due_date_adds_terms() {
        assert_eq!(due_date(d(2024, 1, 31), 15), Some(d(2024, 2, 15)));
        assert_eq!(due_date(d(2024, 1, 31), 0), Some(d(2024, 1, 31)));
    }

    #[test]
    fn frequency_spans() {
        assert_eq!(BillingFrequency::Monthly.months(), 1);
        assert_eq!(BillingFrequency::Quarterly.months(), 3);
        assert_eq!(BillingFrequency::Yearly.months(), 12);
    }
}
