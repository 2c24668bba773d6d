use std::collections::HashMap;

use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::db::DbConn;
use crate::guards::AdminGuard;
use crate::models::{Booking, Package};
use crate::services::stats;
use crate::utils::{ApiError, ApiResponse};

/// Dashboard statistics (admin only). Computed on demand by scanning the
/// bookings and packages collections; nothing is cached.
#[openapi(tag = "Admin")]
#[get("/admin/stats")]
pub async fn get_stats(
    db: &State<DbConn>,
    _admin: AdminGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let total_users = db
        .collection::<mongodb::bson::Document>("users")
        .count_documents(None, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut cursor = db
        .collection::<Booking>("bookings")
        .find(None, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut bookings = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?
    {
        let booking: Booking = cursor
            .deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        bookings.push(booking);
    }

    let mut cursor = db
        .collection::<Package>("packages")
        .find(None, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut package_prices: HashMap<String, f64> = HashMap::new();
    while cursor
        .advance()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?
    {
        let package: Package = cursor
            .deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        if let Some(id) = package.id {
            package_prices.insert(id.to_hex(), package.price);
        }
    }

    let total_revenue = stats::total_revenue(&bookings, &package_prices);
    let booking_stats = stats::bookings_by_status(&bookings);

    Ok(Json(ApiResponse::success(serde_json::json!({
        "totalUsers": total_users,
        "totalBookings": bookings.len(),
        "activePackages": package_prices.len(),
        "totalRevenue": total_revenue,
        "bookingStats": booking_stats,
    }))))
}
