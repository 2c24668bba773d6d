use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::config::AppConfig;
use crate::db::DbConn;
use crate::models::{LoginDto, RegisterDto, Role, User, UserResponse};
use crate::services::JwtService;
use crate::utils::{validate_email, ApiError, ApiResponse, Created};

const MIN_PASSWORD_LEN: usize = 6;

/// Shape checks on new credentials. Runs after the duplicate-email
/// lookup: a taken address answers "already exists" no matter how bad
/// the rest of the submission is.
fn validate_credentials(email: &str, password: &str) -> Result<(), &'static str> {
    if !validate_email(email) {
        return Err("Invalid email format");
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}

/// --------------------
/// Register
/// --------------------
#[openapi(tag = "Auth")]
#[post("/auth/register", data = "<dto>")]
pub async fn register(
    db: &State<DbConn>,
    dto: Json<RegisterDto>,
) -> Result<Created<Json<ApiResponse<serde_json::Value>>>, ApiError> {
    let name = match dto.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ApiError::bad_request("name is required")),
    };
    let email = match dto.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_lowercase(),
        _ => return Err(ApiError::bad_request("email is required")),
    };
    let password = match dto.password.as_deref() {
        Some(password) if !password.is_empty() => password,
        _ => return Err(ApiError::bad_request("password is required")),
    };

    let users = db.collection::<User>("users");

    let existing = users
        .find_one(doc! { "email": &email }, None)
        .await
        .map_err(|e| {
            error!("Registration lookup failed: {}", e);
            ApiError::internal_error("Registration failed")
        })?;
    if existing.is_some() {
        return Err(ApiError::bad_request("User already exists with this email"));
    }

    validate_credentials(&email, password).map_err(ApiError::bad_request)?;

    let password_hash = hash(password, DEFAULT_COST).map_err(|e| {
        error!("Password hashing failed: {}", e);
        ApiError::internal_error("Registration failed")
    })?;

    let user = User {
        id: None,
        name,
        email,
        password: password_hash,
        role: Role::User,
        created_at: DateTime::now(),
    };

    let result = users.insert_one(&user, None).await.map_err(|e| {
        error!("Registration insert failed: {}", e);
        ApiError::internal_error("Registration failed")
    })?;

    let user_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    Ok(Created(Json(ApiResponse::success_with_message(
        "User created successfully".to_string(),
        serde_json::json!({ "user_id": user_id }),
    ))))
}

/// --------------------
/// Login
/// --------------------
#[openapi(tag = "Auth")]
#[post("/auth/login", data = "<dto>")]
pub async fn login(
    db: &State<DbConn>,
    config: &State<AppConfig>,
    dto: Json<LoginDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let (email, password) = match (dto.email.as_deref(), dto.password.as_deref()) {
        (Some(email), Some(password)) => (email.trim().to_lowercase(), password),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    let user = db
        .collection::<User>("users")
        .find_one(doc! { "email": &email }, None)
        .await
        .map_err(|e| {
            error!("Login lookup failed: {}", e);
            ApiError::internal_error("Login failed")
        })?;

    // Unknown email and wrong password are indistinguishable on purpose.
    let user = match user {
        Some(user) if verify(password, &user.password).unwrap_or(false) => user,
        _ => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    let user_id = user
        .id
        .ok_or_else(|| ApiError::internal_error("Login failed"))?;

    let token = JwtService::issue(config, &user_id).map_err(|e| {
        error!("Token issuance failed: {}", e);
        ApiError::internal_error("Login failed")
    })?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "token": token,
        "user": UserResponse::from(user),
    }))))
}

/// --------------------
/// Verify session
/// --------------------
#[openapi(tag = "Auth")]
#[get("/auth/verify")]
pub async fn verify_session(
    auth: crate::guards::AuthGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    Ok(Json(ApiResponse::success(serde_json::json!({
        "user": UserResponse::from(auth.user),
    }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_email_is_reported_before_a_short_password() {
        assert_eq!(
            validate_credentials("not-an-email", "x"),
            Err("Invalid email format")
        );
    }

    #[test]
    fn short_password_is_rejected_at_the_boundary() {
        assert_eq!(
            validate_credentials("user@example.com", "12345"),
            Err("Password must be at least 6 characters long")
        );
        assert!(validate_credentials("user@example.com", "123456").is_ok());
    }
}
