use std::collections::HashMap;

use crate::models::{Booking, BookingStatus};

/// Revenue counts only completed bookings whose package reference still
/// resolves; dangling or absent package ids contribute nothing.
pub fn total_revenue(bookings: &[Booking], package_prices: &HashMap<String, f64>) -> f64 {
    bookings
        .iter()
        .filter(|booking| booking.status == BookingStatus::Completed)
        .filter_map(|booking| booking.package_id.as_deref())
        .filter_map(|package_id| package_prices.get(package_id))
        .sum()
}

/// Booking counts grouped by status. Statuses with no bookings are
/// absent from the map, not zero-filled.
pub fn bookings_by_status(bookings: &[Booking]) -> HashMap<String, i64> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for booking in bookings {
        *counts.entry(booking.status.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn booking(status: BookingStatus, package_id: Option<&str>) -> Booking {
        Booking {
            id: None,
            user_id: "507f1f77bcf86cd799439011".to_string(),
            package_id: package_id.map(str::to_string),
            destination: "Tropical Paradise".to_string(),
            guests: 2,
            check_in: "2026-09-10".to_string(),
            check_out: "2026-09-17".to_string(),
            status,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn revenue_sums_resolvable_completed_bookings_only() {
        let bookings = vec![
            booking(BookingStatus::Completed, Some("pkg-100")),
            booking(BookingStatus::Completed, None),
            booking(BookingStatus::Pending, Some("pkg-50")),
        ];
        let prices = HashMap::from([
            ("pkg-100".to_string(), 100.0),
            ("pkg-50".to_string(), 50.0),
        ]);

        assert_eq!(total_revenue(&bookings, &prices), 100.0);
    }

    #[test]
    fn revenue_ignores_dangling_package_references() {
        let bookings = vec![booking(BookingStatus::Completed, Some("deleted-pkg"))];

        assert_eq!(total_revenue(&bookings, &HashMap::new()), 0.0);
    }

    #[test]
    fn status_counts_skip_empty_statuses() {
        let bookings = vec![
            booking(BookingStatus::Completed, Some("pkg-100")),
            booking(BookingStatus::Completed, None),
            booking(BookingStatus::Pending, Some("pkg-50")),
        ];

        let counts = bookings_by_status(&bookings);
        assert_eq!(counts.get("completed"), Some(&2));
        assert_eq!(counts.get("pending"), Some(&1));
        assert!(!counts.contains_key("confirmed"));
        assert!(!counts.contains_key("cancelled"));
    }

    #[test]
    fn no_bookings_means_empty_stats() {
        assert!(bookings_by_status(&[]).is_empty());
        assert_eq!(total_revenue(&[], &HashMap::new()), 0.0);
    }
}
