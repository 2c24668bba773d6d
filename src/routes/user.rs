use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::db::DbConn;
use crate::guards::AdminGuard;
use crate::models::{User, UserResponse};
use crate::utils::{ApiError, ApiResponse};

/// List all users (admin only). The stored password hash never reaches
/// the wire; everything goes through UserResponse.
#[openapi(tag = "Users")]
#[get("/users")]
pub async fn list_users(
    db: &State<DbConn>,
    _admin: AdminGuard,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = db
        .collection::<User>("users")
        .find(None, options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut users = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?
    {
        let user: User = cursor
            .deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        users.push(UserResponse::from(user));
    }

    Ok(Json(ApiResponse::success(users)))
}

#[openapi(tag = "Users")]
#[get("/users/<user_id>")]
pub async fn get_user(
    db: &State<DbConn>,
    _admin: AdminGuard,
    user_id: String,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let oid = ObjectId::parse_str(&user_id).map_err(|_| ApiError::not_found("User not found"))?;

    let user = db
        .collection::<User>("users")
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Self-deletion is refused before any lookup, so an admin asking to
/// remove their own account never falls through to NotFound/Forbidden.
fn guard_self_deletion(requester: &ObjectId, target_user_id: &str) -> Result<(), ApiError> {
    if requester.to_hex() == target_user_id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }
    Ok(())
}

/// Delete a user (admin only). The user's bookings are left in place as
/// dangling references.
#[openapi(tag = "Users")]
#[delete("/users/<user_id>")]
pub async fn delete_user(
    db: &State<DbConn>,
    admin: AdminGuard,
    user_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    guard_self_deletion(&admin.user_id, &user_id)?;

    let oid = ObjectId::parse_str(&user_id).map_err(|_| ApiError::not_found("User not found"))?;

    let result = db
        .collection::<User>("users")
        .delete_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete user: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(ApiResponse::success_with_message(
        "User deleted successfully".to_string(),
        serde_json::json!({}),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::Status;

    #[test]
    fn deleting_your_own_account_is_refused() {
        let id = ObjectId::new();

        let err = guard_self_deletion(&id, &id.to_hex()).unwrap_err();
        assert_eq!(err.status, Status::BadRequest);
        assert_eq!(err.message, "Cannot delete your own account");
    }

    #[test]
    fn deleting_another_user_passes_the_self_check() {
        assert!(guard_self_deletion(&ObjectId::new(), &ObjectId::new().to_hex()).is_ok());
    }
}
