use chrono::{Months, NaiveDate};

use crate::error::ReservationError;

/// First day on which someone born on `birth_date` is `age_limit` years old.
///
/// Calendar arithmetic: a Feb 29 birthday lands on Feb 28 in common years.
pub fn eligible_from(birth_date: NaiveDate, age_limit: i32) -> NaiveDate {
    if age_limit <= 0 {
        return birth_date;
    }
    (age_limit as u32)
        .checked_mul(12)
        .and_then(|months| birth_date.checked_add_months(Months::new(months)))
        .unwrap_or(NaiveDate::MAX)
}

/// Reaching the age limit on the session date itself is enough.
pub fn check_eligibility(
    birth_date: NaiveDate,
    age_limit: i32,
    session_date: NaiveDate,
) -> Result<(), ReservationError> {
    let eligible_from = eligible_from(birth_date, age_limit);
    if eligible_from > session_date {
        return Err(ReservationError::AgeRequirementNotMet { age_limit, eligible_from });
    }
    Ok(())
}
