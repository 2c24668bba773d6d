use bcrypt::{hash, DEFAULT_COST};
use mongodb::bson::{doc, DateTime};
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::config::AppConfig;
use crate::db::DbConn;
use crate::models::{Booking, BookingStatus, Package, Role, SiteSettings, SocialMedia, User};
use crate::utils::{ApiError, ApiResponse, Created};

fn days_ago(days: i64) -> DateTime {
    DateTime::from_millis(chrono::Utc::now().timestamp_millis() - days * 24 * 60 * 60 * 1000)
}

fn demo_package(
    name: &str,
    description: &str,
    price: f64,
    original_price: f64,
    discount: i32,
    image: &str,
    features: &[&str],
) -> Package {
    Package {
        id: None,
        name: name.to_string(),
        description: description.to_string(),
        price,
        original_price,
        discount,
        image: image.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        created_at: DateTime::now(),
        updated_at: None,
    }
}

fn demo_packages() -> Vec<Package> {
    vec![
        demo_package(
            "Tropical Paradise",
            "Escape to a tropical paradise with pristine beaches, crystal-clear waters, and luxurious resorts. Perfect for relaxation and adventure.",
            1299.0,
            1599.0,
            19,
            "https://images.unsplash.com/photo-1540202404-1b927e27fa8b?ixlib=rb-4.0.3&auto=format&fit=crop&w=675&q=80",
            &[
                "7 days, 6 nights accommodation",
                "All-inclusive resort package",
                "Private beach access",
                "Guided snorkeling tours",
                "Daily breakfast and dinner",
                "Airport transfers included",
            ],
        ),
        demo_package(
            "Mountain Retreat",
            "Experience the serenity of mountain landscapes with cozy lodges, hiking trails, and breathtaking views. Perfect for nature lovers.",
            899.0,
            1099.0,
            18,
            "https://images.unsplash.com/photo-1486870591958-9b9d0d1dda99?ixlib=rb-4.0.3&auto=format&fit=crop&w=675&q=80",
            &[
                "5 days, 4 nights stay",
                "Luxury mountain cabin",
                "Guided hiking trails",
                "Spa and wellness services",
                "Local cuisine experience",
                "Photography workshop",
            ],
        ),
        demo_package(
            "European Adventure",
            "Discover the rich history and vibrant culture of Europe's most beautiful cities. An unforgettable journey through time.",
            1899.0,
            2299.0,
            17,
            "https://images.unsplash.com/photo-1519677100203-a0e668c92439?ixlib=rb-4.0.3&auto=format&fit=crop&w=675&q=80",
            &[
                "10 days, 9 nights tour",
                "Visit 3 countries",
                "Professional tour guides",
                "Premium hotel accommodations",
                "Museum and attraction tickets",
                "High-speed train travel",
            ],
        ),
        demo_package(
            "Desert Safari",
            "Experience the magic of the desert with camel rides, traditional camps, and stunning sunsets. An adventure like no other.",
            799.0,
            999.0,
            20,
            "https://images.unsplash.com/photo-1509316975850-ff9c5deb0cd9?ixlib=rb-4.0.3&auto=format&fit=crop&w=675&q=80",
            &[
                "4 days, 3 nights experience",
                "Luxury desert camp",
                "Camel trekking adventure",
                "Traditional Bedouin dinner",
                "Star gazing sessions",
                "4WD desert exploration",
            ],
        ),
        demo_package(
            "City Explorer",
            "Dive into the urban jungle with guided city tours, cultural experiences, and modern attractions. Perfect for city lovers.",
            699.0,
            849.0,
            18,
            "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?ixlib=rb-4.0.3&auto=format&fit=crop&w=675&q=80",
            &[
                "3 days, 2 nights stay",
                "Boutique hotel accommodation",
                "City walking tours",
                "Local food experiences",
                "Museum and gallery visits",
                "Shopping district access",
            ],
        ),
        demo_package(
            "Island Hopping",
            "Explore multiple tropical islands with boat tours, water sports, and beachside relaxation. The ultimate island experience.",
            1599.0,
            1999.0,
            20,
            "https://images.unsplash.com/photo-1559827260-dc66d52bef19?ixlib=rb-4.0.3&auto=format&fit=crop&w=675&q=80",
            &[
                "8 days, 7 nights adventure",
                "Visit 4 different islands",
                "Private boat transfers",
                "Water sports equipment",
                "Beachfront accommodations",
                "Island hopping guide",
            ],
        ),
    ]
}

/// --------------------
/// Seed demo data
/// --------------------
/// Refuses when any user exists; otherwise populates the fixed demo set:
/// 2 users, 6 packages, 2 bookings, 1 settings record.
#[openapi(tag = "System")]
#[post("/seed")]
pub async fn seed(
    db: &State<DbConn>,
) -> Result<Created<Json<ApiResponse<serde_json::Value>>>, ApiError> {
    let users = db.collection::<User>("users");

    let existing = users
        .count_documents(None, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;
    if existing > 0 {
        return Err(ApiError::bad_request(
            "Database already contains data. Clear it first if you want to reseed.",
        ));
    }

    let admin_user = User {
        id: None,
        name: "Admin User".to_string(),
        email: "admin@example.com".to_string(),
        password: hash("admin123", DEFAULT_COST)
            .map_err(|e| ApiError::internal_error(format!("Hashing error: {}", e)))?,
        role: Role::Admin,
        created_at: DateTime::now(),
    };
    let admin_id = users
        .insert_one(&admin_user, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to seed users: {}", e)))?
        .inserted_id;

    let test_user = User {
        id: None,
        name: "Test User".to_string(),
        email: "user@example.com".to_string(),
        password: hash("user123", DEFAULT_COST)
            .map_err(|e| ApiError::internal_error(format!("Hashing error: {}", e)))?,
        role: Role::User,
        created_at: DateTime::now(),
    };
    let test_user_id = users
        .insert_one(&test_user, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to seed users: {}", e)))?
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Failed to seed users"))?;

    let packages = demo_packages();
    let inserted = db
        .collection::<Package>("packages")
        .insert_many(&packages, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to seed packages: {}", e)))?;

    let package_id = |index: usize| -> Option<String> {
        inserted
            .inserted_ids
            .get(&index)
            .and_then(|id| id.as_object_id())
            .map(|id| id.to_hex())
    };

    let sample_bookings = vec![
        Booking {
            id: None,
            user_id: test_user_id.to_hex(),
            package_id: package_id(0),
            destination: packages[0].name.clone(),
            guests: 2,
            check_in: "2024-07-15".to_string(),
            check_out: "2024-07-22".to_string(),
            status: BookingStatus::Confirmed,
            created_at: days_ago(5),
            updated_at: days_ago(5),
        },
        Booking {
            id: None,
            user_id: test_user_id.to_hex(),
            package_id: package_id(1),
            destination: packages[1].name.clone(),
            guests: 1,
            check_in: "2024-08-01".to_string(),
            check_out: "2024-08-05".to_string(),
            status: BookingStatus::Pending,
            created_at: days_ago(2),
            updated_at: days_ago(2),
        },
    ];
    db.collection::<Booking>("bookings")
        .insert_many(&sample_bookings, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to seed bookings: {}", e)))?;

    let settings = SiteSettings {
        id: None,
        site_name: Some("Travel Explorer".to_string()),
        contact_email: Some("info@travelexplorer.com".to_string()),
        phone: Some("+1 (555) 123-4567".to_string()),
        address: Some("123 Adventure Lane, Travel City, TC 12345".to_string()),
        description: Some(
            "Your gateway to amazing travel experiences around the world.".to_string(),
        ),
        social_media: Some(SocialMedia {
            facebook: Some("https://facebook.com/travelexplorer".to_string()),
            twitter: Some("https://twitter.com/travelexplorer".to_string()),
            instagram: Some("https://instagram.com/travelexplorer".to_string()),
        }),
        updated_at: Some(DateTime::now()),
        updated_by: admin_id.as_object_id().map(|id| id.to_hex()),
    };
    db.collection::<SiteSettings>("settings")
        .insert_one(&settings, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to seed settings: {}", e)))?;

    info!("Database seeded with demo data");

    Ok(Created(Json(ApiResponse::success_with_message(
        "Database seeded successfully".to_string(),
        serde_json::json!({
                "users_created": 2,
                "packages_created": packages.len(),
                "bookings_created": sample_bookings.len(),
                "admin_credentials": {
                    "email": "admin@example.com",
                    "password": "admin123"
                }
            }),
        )),
    ))
}

/// --------------------
/// Clear database (development only)
/// --------------------
#[openapi(tag = "System")]
#[delete("/clear-db")]
pub async fn clear_db(
    db: &State<DbConn>,
    config: &State<AppConfig>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if !config.development {
        return Err(ApiError::forbidden(
            "This endpoint is only available in development mode",
        ));
    }

    for collection in ["users", "packages", "bookings", "settings"] {
        db.collection::<mongodb::bson::Document>(collection)
            .delete_many(doc! {}, None)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to clear database: {}", e)))?;
    }

    warn!("All collections cleared");

    Ok(Json(ApiResponse::success_with_message(
        "Database cleared successfully".to_string(),
        serde_json::json!({}),
    )))
}

/// --------------------
/// Health check
/// --------------------
/// The response status depends on the probe at runtime, which a static
/// OpenAPI description cannot express.
#[openapi(skip)]
#[get("/health")]
pub async fn health(db: &State<DbConn>) -> status::Custom<Json<serde_json::Value>> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match db.run_command(doc! { "ping": 1 }, None).await {
        Ok(_) => status::Custom(
            Status::Ok,
            Json(serde_json::json!({
                "status": "healthy",
                "database": "connected",
                "timestamp": timestamp,
            })),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            status::Custom(
                Status::InternalServerError,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "timestamp": timestamp,
                })),
            )
        }
    }
}
