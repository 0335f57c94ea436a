//! # Warranty Arithmetic
//!
//! Calendar-month warranty calculations shared by the service-record
//! workflow and the read-time derived fields.

use chrono::{DateTime, Months, Utc};

/// Compute the warranty expiry from the purchase date and the machine's
/// warranty period, in calendar months. Day-of-month is clamped at the end
/// of shorter months (e.g. Jan 31 + 1 month = Feb 28/29).
#[must_use]
pub fn warranty_expiry(purchase_date: DateTime<Utc>, warranty_months: i32) -> DateTime<Utc> {
    let months = Months::new(warranty_months.max(0) as u32);
    purchase_date
        .checked_add_months(months)
        .unwrap_or(purchase_date)
}

/// Whole days remaining until `expiry`, rounded up; never negative.
#[must_use]
pub fn days_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = expiry - now;
    if remaining.num_seconds() <= 0 {
        return 0;
    }
    let days = remaining.num_days();
    if remaining - chrono::Duration::days(days) > chrono::Duration::zero() {
        days + 1
    }
    else {
        days
    }
}

/// Warranty state derived at read time.
#[must_use]
pub fn warranty_status(expiry: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    if expiry > now {
        "ACTIVE"
    }
    else {
        "EXPIRED"
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap() }

    #[test]
    fn test_expiry_calendar_months() {
        assert_eq!(warranty_expiry(utc(2026, 1, 15), 12), utc(2027, 1, 15));
        assert_eq!(warranty_expiry(utc(2026, 3, 10), 6), utc(2026, 9, 10));
    }

    #[test]
    fn test_expiry_eighteen_months_crosses_year() {
        assert_eq!(warranty_expiry(utc(2024, 6, 1), 18), utc(2025, 12, 1));
    }

    #[test]
    fn test_expiry_clamps_month_end() {
        // Jan 31 + 1 month lands on the last day of February.
        assert_eq!(warranty_expiry(utc(2026, 1, 31), 1), utc(2026, 2, 28));
        assert_eq!(warranty_expiry(utc(2024, 1, 31), 1), utc(2024, 2, 29));
    }

    #[test]
    fn test_expiry_zero_months() {
        let purchase = utc(2026, 5, 1);
        assert_eq!(warranty_expiry(purchase, 0), purchase);
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
        // 1.5 days left rounds up to 2.
        assert_eq!(days_remaining(expiry, now), 2);
    }

    #[test]
    fn test_days_remaining_never_negative() {
        let now = utc(2026, 6, 1);
        assert_eq!(days_remaining(utc(2026, 5, 1), now), 0);
        assert_eq!(days_remaining(now, now), 0);
    }

    #[test]
    fn test_warranty_status() {
        let now = utc(2026, 6, 1);
        assert_eq!(warranty_status(utc(2026, 7, 1), now), "ACTIVE");
        assert_eq!(warranty_status(utc(2026, 5, 1), now), "EXPIRED");
    }
}
