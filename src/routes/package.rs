use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::db::DbConn;
use crate::guards::AdminGuard;
use crate::models::{coerce_features, CreatePackageDto, Package, PackageResponse, UpdatePackageDto};
use crate::utils::{ApiError, ApiResponse, Created};

/// Get all packages (public, unfiltered)
#[openapi(tag = "Packages")]
#[get("/packages")]
pub async fn list_packages(
    db: &State<DbConn>,
) -> Result<Json<ApiResponse<Vec<PackageResponse>>>, ApiError> {
    let mut cursor = db
        .collection::<Package>("packages")
        .find(None, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut packages = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?
    {
        let package = cursor
            .deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        packages.push(PackageResponse::from(package));
    }

    Ok(Json(ApiResponse::success(packages)))
}

/// Get a single package (public). A malformed id is just "not found".
#[openapi(tag = "Packages")]
#[get("/packages/<package_id>")]
pub async fn get_package(
    db: &State<DbConn>,
    package_id: String,
) -> Result<Json<ApiResponse<PackageResponse>>, ApiError> {
    let oid = ObjectId::parse_str(&package_id)
        .map_err(|_| ApiError::not_found("Package not found"))?;

    let package = db
        .collection::<Package>("packages")
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Package not found"))?;

    Ok(Json(ApiResponse::success(PackageResponse::from(package))))
}

/// Create a package (admin only)
#[openapi(tag = "Packages")]
#[post("/packages", data = "<dto>")]
pub async fn create_package(
    db: &State<DbConn>,
    _admin: AdminGuard,
    dto: Json<CreatePackageDto>,
) -> Result<Created<Json<ApiResponse<PackageResponse>>>, ApiError> {
    let name = dto
        .name
        .clone()
        .ok_or_else(|| ApiError::bad_request("name is required"))?;
    let description = dto
        .description
        .clone()
        .ok_or_else(|| ApiError::bad_request("description is required"))?;
    let price = dto
        .price
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("price is required"))?
        .as_f64()
        .ok_or_else(|| ApiError::bad_request("price must be a number"))?;
    let original_price = dto
        .original_price
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("originalPrice is required"))?
        .as_f64()
        .ok_or_else(|| ApiError::bad_request("originalPrice must be a number"))?;
    let discount = dto
        .discount
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("discount is required"))?
        .as_i32()
        .ok_or_else(|| ApiError::bad_request("discount must be an integer"))?;
    let image = dto
        .image
        .clone()
        .ok_or_else(|| ApiError::bad_request("image is required"))?;
    let features = dto
        .features
        .as_ref()
        .map(coerce_features)
        .ok_or_else(|| ApiError::bad_request("features is required"))?;

    if price < 0.0 || original_price < 0.0 {
        return Err(ApiError::bad_request("price must be non-negative"));
    }

    let package = Package {
        id: None,
        name,
        description,
        price,
        original_price,
        discount,
        image,
        features,
        created_at: DateTime::now(),
        updated_at: Some(DateTime::now()),
    };

    let result = db
        .collection::<Package>("packages")
        .insert_one(&package, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create package: {}", e)))?;

    let mut created = package;
    created.id = result.inserted_id.as_object_id();

    Ok(Created(Json(ApiResponse::success(PackageResponse::from(
        created,
    )))))
}

/// Update a package (admin only). Partial semantics: absent fields are
/// left untouched; updated_at always moves.
#[openapi(tag = "Packages")]
#[put("/packages/<package_id>", data = "<dto>")]
pub async fn update_package(
    db: &State<DbConn>,
    _admin: AdminGuard,
    package_id: String,
    dto: Json<UpdatePackageDto>,
) -> Result<Json<ApiResponse<PackageResponse>>, ApiError> {
    let oid = ObjectId::parse_str(&package_id)
        .map_err(|_| ApiError::not_found("Package not found"))?;

    let mut update_doc: Document = doc! {
        "updated_at": DateTime::now()
    };

    if let Some(ref name) = dto.name {
        update_doc.insert("name", name);
    }
    if let Some(ref description) = dto.description {
        update_doc.insert("description", description);
    }
    if let Some(ref price) = dto.price {
        let price = price
            .as_f64()
            .ok_or_else(|| ApiError::bad_request("price must be a number"))?;
        if price < 0.0 {
            return Err(ApiError::bad_request("price must be non-negative"));
        }
        update_doc.insert("price", price);
    }
    if let Some(ref original_price) = dto.original_price {
        let original_price = original_price
            .as_f64()
            .ok_or_else(|| ApiError::bad_request("originalPrice must be a number"))?;
        if original_price < 0.0 {
            return Err(ApiError::bad_request("originalPrice must be non-negative"));
        }
        update_doc.insert("originalPrice", original_price);
    }
    if let Some(ref discount) = dto.discount {
        let discount = discount
            .as_i32()
            .ok_or_else(|| ApiError::bad_request("discount must be an integer"))?;
        update_doc.insert("discount", discount);
    }
    if let Some(ref image) = dto.image {
        update_doc.insert("image", image);
    }
    if let Some(ref features) = dto.features {
        update_doc.insert("features", features.clone());
    }

    let packages = db.collection::<Package>("packages");

    let result = packages
        .update_one(doc! { "_id": oid }, doc! { "$set": update_doc }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update package: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Package not found"));
    }

    let package = packages
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Package not found"))?;

    Ok(Json(ApiResponse::success(PackageResponse::from(package))))
}

/// Delete a package (admin only). Bookings referencing it are left in
/// place; their package enrichment simply stops resolving.
#[openapi(tag = "Packages")]
#[delete("/packages/<package_id>")]
pub async fn delete_package(
    db: &State<DbConn>,
    _admin: AdminGuard,
    package_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let oid = ObjectId::parse_str(&package_id)
        .map_err(|_| ApiError::not_found("Package not found"))?;

    let result = db
        .collection::<Package>("packages")
        .delete_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete package: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("Package not found"));
    }

    Ok(Json(ApiResponse::success_with_message(
        "Package deleted successfully".to_string(),
        serde_json::json!({}),
    )))
}
