use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::FindOptions;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::db::DbConn;
use crate::guards::AuthGuard;
use crate::models::{
    Booking, BookingResponse, BookingStatus, CreateBookingDto, Package, PackageSummary,
    UpdateBookingStatusDto, User, UserSummary,
};
use crate::utils::{parse_stay_date, validate_stay, ApiError, ApiResponse, Created};

/// Best-effort package lookup for display. A dangling or malformed
/// reference yields None, never an error.
async fn package_summary(db: &DbConn, package_id: &str) -> Option<PackageSummary> {
    let oid = ObjectId::parse_str(package_id).ok()?;
    db.collection::<Package>("packages")
        .find_one(doc! { "_id": oid }, None)
        .await
        .ok()
        .flatten()
        .map(|package| PackageSummary {
            name: package.name,
            price: package.price,
            image: package.image,
        })
}

async fn user_summary(db: &DbConn, user_id: &str) -> Option<UserSummary> {
    let oid = ObjectId::parse_str(user_id).ok()?;
    db.collection::<User>("users")
        .find_one(doc! { "_id": oid }, None)
        .await
        .ok()
        .flatten()
        .map(|user| UserSummary {
            name: user.name,
            email: user.email,
        })
}

/// Admins may move a booking to any status; an owner may only cancel
/// their own booking. Everyone else is denied.
fn status_change_allowed(
    requester: &User,
    is_owner: bool,
    target: BookingStatus,
) -> Result<(), ApiError> {
    if requester.is_admin() {
        return Ok(());
    }
    if !is_owner {
        return Err(ApiError::forbidden("Access denied"));
    }
    if target != BookingStatus::Cancelled {
        return Err(ApiError::forbidden(
            "Users can only cancel their own bookings",
        ));
    }
    Ok(())
}

/// The store filter behind a booking listing. Admins may request every
/// booking with the all flag; anyone else is scoped to their own
/// bookings regardless of what they ask for.
fn booking_filter(requester: &User, requester_id: &ObjectId, all: Option<bool>) -> Option<Document> {
    if requester.is_admin() && all == Some(true) {
        None
    } else {
        Some(doc! { "user_id": requester_id.to_hex() })
    }
}

/// --------------------
/// Create booking
/// --------------------
#[openapi(tag = "Bookings")]
#[post("/bookings", data = "<dto>")]
pub async fn create_booking(
    db: &State<DbConn>,
    auth: AuthGuard,
    dto: Json<CreateBookingDto>,
) -> Result<Created<Json<ApiResponse<BookingResponse>>>, ApiError> {
    let destination = match dto.destination.as_deref().map(str::trim) {
        Some(destination) if !destination.is_empty() => destination.to_string(),
        _ => return Err(ApiError::bad_request("destination is required")),
    };
    let guests = match dto.guests {
        Some(guests) if guests > 0 => guests,
        Some(_) => return Err(ApiError::bad_request("guests must be a positive integer")),
        None => return Err(ApiError::bad_request("guests is required")),
    };
    let check_in_raw = dto
        .check_in
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("check_in is required"))?;
    let check_out_raw = dto
        .check_out
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("check_out is required"))?;

    let (check_in, check_out) = match (
        parse_stay_date(&check_in_raw),
        parse_stay_date(&check_out_raw),
    ) {
        (Some(check_in), Some(check_out)) => (check_in, check_out),
        _ => return Err(ApiError::bad_request("Invalid date format. Use YYYY-MM-DD")),
    };

    let today = chrono::Utc::now().date_naive();
    validate_stay(check_in, check_out, today).map_err(ApiError::bad_request)?;

    let booking = Booking {
        id: None,
        user_id: auth.user_id.to_hex(),
        package_id: dto.package_id.clone(),
        destination,
        guests,
        check_in: check_in_raw,
        check_out: check_out_raw,
        status: BookingStatus::Pending,
        created_at: DateTime::now(),
        updated_at: DateTime::now(),
    };

    let result = db
        .collection::<Booking>("bookings")
        .insert_one(&booking, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create booking: {}", e)))?;

    let mut created = booking;
    created.id = result.inserted_id.as_object_id();

    Ok(Created(Json(ApiResponse::success(BookingResponse::from(
        created,
    )))))
}

/// --------------------
/// List bookings
/// --------------------
/// Admins may ask for every booking with ?all=true; everyone else gets
/// their own, regardless of the flag. Newest first.
#[openapi(tag = "Bookings")]
#[get("/bookings?<all>")]
pub async fn list_bookings(
    db: &State<DbConn>,
    auth: AuthGuard,
    all: Option<bool>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    let is_admin = auth.user.is_admin();

    let filter = booking_filter(&auth.user, &auth.user_id, all);
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = db
        .collection::<Booking>("bookings")
        .find(filter, options)
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

    let mut responses = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let package = match booking.package_id.as_deref() {
            Some(package_id) => package_summary(db, package_id).await,
            None => None,
        };
        // Owner details are an admin-view concern only.
        let user = if is_admin {
            user_summary(db, &booking.user_id).await
        } else {
            None
        };
        responses.push(BookingResponse::new(booking, package, user));
    }

    Ok(Json(ApiResponse::success(responses)))
}

/// --------------------
/// Get booking
/// --------------------
#[openapi(tag = "Bookings")]
#[get("/bookings/<booking_id>")]
pub async fn get_booking(
    db: &State<DbConn>,
    auth: AuthGuard,
    booking_id: String,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let oid = ObjectId::parse_str(&booking_id)
        .map_err(|_| ApiError::not_found("Booking not found"))?;

    let booking = db
        .collection::<Booking>("bookings")
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    if booking.user_id != auth.user_id.to_hex() && !auth.user.is_admin() {
        return Err(ApiError::forbidden("Access denied"));
    }

    Ok(Json(ApiResponse::success(BookingResponse::from(booking))))
}

/// --------------------
/// Update booking status
/// --------------------
#[openapi(tag = "Bookings")]
#[patch("/bookings/<booking_id>", data = "<dto>")]
pub async fn update_booking_status(
    db: &State<DbConn>,
    auth: AuthGuard,
    booking_id: String,
    dto: Json<UpdateBookingStatusDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let status = dto
        .status
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;
    let target = BookingStatus::parse(status).ok_or_else(|| {
        ApiError::bad_request(
            "Invalid status. Must be one of: pending, confirmed, completed, cancelled",
        )
    })?;

    let oid = ObjectId::parse_str(&booking_id)
        .map_err(|_| ApiError::not_found("Booking not found"))?;

    let bookings = db.collection::<Booking>("bookings");

    let booking = bookings
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    let is_owner = booking.user_id == auth.user_id.to_hex();
    status_change_allowed(&auth.user, is_owner, target)?;

    bookings
        .update_one(
            doc! { "_id": oid },
            doc! { "$set": {
                "status": target.as_str(),
                "updated_at": DateTime::now()
            }},
            None,
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update booking: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Booking status updated successfully".to_string(),
        serde_json::json!({ "status": target.as_str() }),
    )))
}

/// --------------------
/// Delete booking
/// --------------------
#[openapi(tag = "Bookings")]
#[delete("/bookings/<booking_id>")]
pub async fn delete_booking(
    db: &State<DbConn>,
    auth: AuthGuard,
    booking_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let oid = ObjectId::parse_str(&booking_id)
        .map_err(|_| ApiError::not_found("Booking not found"))?;

    let bookings = db.collection::<Booking>("bookings");

    let booking = bookings
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    if !auth.user.is_admin() && booking.user_id != auth.user_id.to_hex() {
        return Err(ApiError::forbidden("Access denied"));
    }

    bookings
        .delete_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete booking: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Booking deleted successfully".to_string(),
        serde_json::json!({}),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use mongodb::bson::DateTime;
    use rocket::http::Status;

    fn user(role: Role) -> User {
        User {
            id: Some(ObjectId::new()),
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            password: "hash".to_string(),
            role,
            created_at: DateTime::now(),
        }
    }

    #[test]
    fn admin_may_set_any_status() {
        let admin = user(Role::Admin);
        for target in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            // Admins are not bound by ownership either.
            assert!(status_change_allowed(&admin, false, target).is_ok());
        }
    }

    #[test]
    fn owner_may_only_cancel() {
        let owner = user(Role::User);

        assert!(status_change_allowed(&owner, true, BookingStatus::Cancelled).is_ok());

        let err = status_change_allowed(&owner, true, BookingStatus::Confirmed).unwrap_err();
        assert_eq!(err.status, Status::Forbidden);
    }

    #[test]
    fn non_owner_is_denied_even_for_cancel() {
        let stranger = user(Role::User);

        let err = status_change_allowed(&stranger, false, BookingStatus::Cancelled).unwrap_err();
        assert_eq!(err.status, Status::Forbidden);
    }

    #[test]
    fn all_flag_is_ignored_for_non_admins() {
        let requester = user(Role::User);
        let id = requester.id.unwrap();

        let filter = booking_filter(&requester, &id, Some(true))
            .expect("non-admins are always scoped to their own bookings");
        assert_eq!(filter.get_str("user_id").unwrap(), id.to_hex());
    }

    #[test]
    fn admin_sees_everything_only_when_asking_for_it() {
        let admin = user(Role::Admin);
        let id = admin.id.unwrap();

        assert!(booking_filter(&admin, &id, Some(true)).is_none());
        assert!(booking_filter(&admin, &id, Some(false)).is_some());
        assert!(booking_filter(&admin, &id, None).is_some());
    }
}
