//! # Shipping Estimates
//!
//! Estimated delivery dates and mock carrier tracking numbers for
//! confirmation emails.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;

/// Calendar days added to the order date before weekend adjustment
pub const DELIVERY_LEAD_DAYS: i64 = 4;

/// Carrier prefix of generated tracking numbers
pub const TRACKING_PREFIX: &str = "92748999";

pub const TRACKING_NUMBER_LEN: usize = 22;

const TRACKING_SUFFIX_MIN: u64 = 10_000_000_000_000;
const TRACKING_SUFFIX_MAX: u64 = 99_999_999_999_999;

/// Order date + 4 days, pushed forward to the next weekday
pub fn estimated_delivery(ordered_at: DateTime<Utc>) -> NaiveDate {
    let mut date = ordered_at.date_naive() + Duration::days(DELIVERY_LEAD_DAYS);
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}

/// Random 22-digit tracking number. Not checked for uniqueness.
pub fn tracking_number() -> String {
    let suffix = rand::rng().random_range(TRACKING_SUFFIX_MIN..=TRACKING_SUFFIX_MAX);
    format!("{}{}", TRACKING_PREFIX, suffix)
}

/// Order tracking page link, e.g. `https://shop.example/orderstatus?order=1a2b3c`
pub fn tracking_link(base: &str, order_id: &str) -> String {
    format!("{}?order={}", base.trim_end_matches(['/', '?']), order_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_thursday_lands_on_monday() {
        // 2024-01-04 is a Thursday
        assert_eq!(estimated_delivery(at(2024, 1, 4)), ymd(2024, 1, 8));
    }

    #[test]
    fn test_friday_lands_on_tuesday() {
        assert_eq!(estimated_delivery(at(2024, 1, 5)), ymd(2024, 1, 9));
    }

    #[test]
    fn test_landing_on_saturday_skips_to_monday() {
        // Tuesday + 4 = Saturday
        assert_eq!(estimated_delivery(at(2024, 1, 2)), ymd(2024, 1, 8));
    }

    #[test]
    fn test_landing_on_sunday_skips_to_monday() {
        // Wednesday + 4 = Sunday
        assert_eq!(estimated_delivery(at(2024, 1, 3)), ymd(2024, 1, 8));
    }

    #[test]
    fn test_across_month_boundary() {
        // Thursday 2024-02-29 + 4 = Monday 2024-03-04
        assert_eq!(estimated_delivery(at(2024, 2, 29)), ymd(2024, 3, 4));
    }

    #[test]
    fn test_never_a_weekend() {
        let start = at(2024, 1, 1);
        for offset in 0..28 {
            let day = estimated_delivery(start + Duration::days(offset));
            assert!(!matches!(day.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn test_tracking_link() {
        assert_eq!(
            tracking_link("https://shop.example/orderstatus.html", "abc123"),
            "https://shop.example/orderstatus.html?order=abc123"
        );
        assert_eq!(
            tracking_link("https://shop.example/track/", "abc123"),
            "https://shop.example/track?order=abc123"
        );
    }

    #[test]
    fn test_tracking_number_shape() {
        let tracking = tracking_number();
        assert_eq!(tracking.len(), TRACKING_NUMBER_LEN);
        assert!(tracking.starts_with(TRACKING_PREFIX));
        assert!(tracking.chars().all(|c| c.is_ascii_digit()));
    }
}
