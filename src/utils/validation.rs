use chrono::NaiveDate;
use regex::Regex;

pub fn validate_email(email: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    re.is_match(email)
}

pub fn parse_stay_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Booking date rules: the stay must span at least one night and may not
/// start before `today`. Time of day is never considered.
pub fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> Result<(), &'static str> {
    if check_in >= check_out {
        return Err("Check-out date must be after check-in date");
    }
    if check_in < today {
        return Err("Check-in date cannot be in the past");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        parse_stay_date(s).unwrap()
    }

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.domain.co"));
    }

    #[test]
    fn email_rejects_garbage() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@tld"));
        assert!(!validate_email("@example.com"));
    }

    #[test]
    fn stay_date_parses_iso_only() {
        assert_eq!(parse_stay_date("2026-09-15"), Some(d("2026-09-15")));
        assert!(parse_stay_date("15/09/2026").is_none());
        assert!(parse_stay_date("2026-13-01").is_none());
    }

    #[test]
    fn same_day_checkout_is_rejected() {
        let today = d("2026-09-01");
        assert!(validate_stay(d("2026-09-10"), d("2026-09-10"), today).is_err());
    }

    #[test]
    fn one_night_stay_is_accepted() {
        let today = d("2026-09-01");
        assert!(validate_stay(d("2026-09-10"), d("2026-09-11"), today).is_ok());
    }

    #[test]
    fn past_check_in_is_rejected_even_with_valid_range() {
        let today = d("2026-09-01");
        let yesterday = today - Duration::days(1);
        assert!(validate_stay(yesterday, d("2026-09-11"), today).is_err());
    }

    #[test]
    fn check_in_today_is_allowed() {
        let today = d("2026-09-01");
        assert!(validate_stay(today, today + Duration::days(3), today).is_ok());
    }
}
