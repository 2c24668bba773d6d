use rocket::request::{self, FromRequest, Request, Outcome};
use rocket::http::Status;
use mongodb::bson::{doc, oid::ObjectId};
use jsonwebtoken::errors::ErrorKind;

// === OpenAPI (compatible with rocket_okapi 0.8.0 / 0.8.1) ===
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use rocket_okapi::r#gen::OpenApiGenerator;

use crate::config::AppConfig;
use crate::db::DbConn;
use crate::models::User;
use crate::services::JwtService;

/// Guards cannot carry a response body, so the failure message rides the
/// request-local cache and is read back by the 401/403 catchers.
pub struct GuardFailure(pub &'static str);

fn deny(req: &Request<'_>, status: Status, message: &'static str) -> Outcome<AuthGuard, ()> {
    req.local_cache(|| GuardFailure(message));
    Outcome::Error((status, ()))
}

/// Authenticated-request guard: validates the session token and resolves
/// it to a live user record. A cryptographically valid token whose user
/// has since been deleted is rejected the same as a bad token.
pub struct AuthGuard {
    pub user_id: ObjectId,
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthGuard {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let token = match req.headers().get_one("Authorization") {
            Some(token) => token.trim_start_matches("Bearer "),
            None => return deny(req, Status::Unauthorized, "Token is missing"),
        };

        let (config, db) = match (
            req.rocket().state::<AppConfig>(),
            req.rocket().state::<DbConn>(),
        ) {
            (Some(config), Some(db)) => (config, db),
            _ => return deny(req, Status::InternalServerError, "Service unavailable"),
        };

        let claims = match JwtService::validate(config, token) {
            Ok(claims) => claims,
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                return deny(req, Status::Unauthorized, "Token has expired");
            }
            Err(_) => return deny(req, Status::Unauthorized, "Token is invalid"),
        };

        let user_id = match ObjectId::parse_str(&claims.sub) {
            Ok(user_id) => user_id,
            Err(_) => return deny(req, Status::Unauthorized, "Token is invalid"),
        };

        match db
            .collection::<User>("users")
            .find_one(doc! { "_id": user_id }, None)
            .await
        {
            Ok(Some(user)) => Outcome::Success(AuthGuard { user_id, user }),
            Ok(None) => deny(req, Status::Unauthorized, "Invalid token"),
            Err(_) => deny(req, Status::Unauthorized, "Token validation failed"),
        }
    }
}

/// Admin guard: authentication first, then the role check. 401 and 403
/// stay distinct so callers can tell "log in" from "not allowed".
pub struct AdminGuard {
    pub user_id: ObjectId,
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminGuard {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.guard::<AuthGuard>().await {
            Outcome::Success(auth) => {
                if auth.user.is_admin() {
                    Outcome::Success(AdminGuard {
                        user_id: auth.user_id,
                        user: auth.user,
                    })
                } else {
                    req.local_cache(|| GuardFailure("Admin access required"));
                    Outcome::Error((Status::Forbidden, ()))
                }
            }
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}

/// === OpenAPI Integration (Fallback for older versions) ===
/// Keeps OpenAPI generation working even without new traits.
impl<'a> OpenApiFromRequest<'a> for AuthGuard {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}

impl<'a> OpenApiFromRequest<'a> for AdminGuard {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}
