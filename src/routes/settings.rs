use mongodb::bson::{doc, to_bson, DateTime, Document};
use mongodb::options::UpdateOptions;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::db::DbConn;
use crate::guards::AdminGuard;
use crate::models::{SettingsResponse, SiteSettings, UpdateSettingsDto};
use crate::utils::{ApiError, ApiResponse};

/// Site settings are a singleton document: read whatever is there, or an
/// empty object if nothing has been written yet.
#[openapi(tag = "Settings")]
#[get("/settings")]
pub async fn get_settings(
    db: &State<DbConn>,
    _admin: AdminGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let settings = db
        .collection::<SiteSettings>("settings")
        .find_one(doc! {}, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let body = match settings {
        Some(settings) => serde_json::to_value(SettingsResponse::from(settings))
            .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?,
        None => serde_json::json!({}),
    };

    Ok(Json(ApiResponse::success(body)))
}

/// Upsert the singleton settings document (admin only). Only provided
/// fields are written; updated_at/updated_by are stamped server-side.
#[openapi(tag = "Settings")]
#[post("/settings", data = "<dto>")]
pub async fn update_settings(
    db: &State<DbConn>,
    admin: AdminGuard,
    dto: Json<UpdateSettingsDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut update_doc: Document = doc! {
        "updated_at": DateTime::now(),
        "updated_by": admin.user_id.to_hex(),
    };

    if let Some(ref site_name) = dto.site_name {
        update_doc.insert("siteName", site_name);
    }
    if let Some(ref contact_email) = dto.contact_email {
        update_doc.insert("contactEmail", contact_email);
    }
    if let Some(ref phone) = dto.phone {
        update_doc.insert("phone", phone);
    }
    if let Some(ref address) = dto.address {
        update_doc.insert("address", address);
    }
    if let Some(ref description) = dto.description {
        update_doc.insert("description", description);
    }
    if let Some(ref social_media) = dto.social_media {
        let social = to_bson(social_media)
            .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
        update_doc.insert("socialMedia", social);
    }

    db.collection::<SiteSettings>("settings")
        .update_one(
            doc! {},
            doc! { "$set": update_doc },
            UpdateOptions::builder().upsert(true).build(),
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update settings: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Settings updated successfully".to_string(),
        serde_json::json!({}),
    )))
}
