//! Request bodies and the `Resource` / `Editable` wiring for every table.

pub mod billing;
pub mod documents;
pub mod fleet;

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) use crate::config::validate_currency;

/// Largest amount a `DECIMAL(14, 2)` money column holds
pub const MAX_MONEY: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Signed amount that fits a money column
pub(crate) fn money(value: &Decimal) -> Result<(), ValidationError> {
    if value.abs() > MAX_MONEY {
        let mut err = ValidationError::new("money");
        err.message = Some(format!("must be within +/-{}", MAX_MONEY).into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    money(value)?;
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn percent(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("percent");
        err.message = Some("must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

/// Inclusive range check shared by every dated input
pub(crate) fn ordered_dates(
    start: chrono::NaiveDate,
    end: Option<chrono::NaiveDate>,
    code: &'static str,
) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => {
            let mut err = ValidationError::new(code);
            err.message = Some("end date must not precede start date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
