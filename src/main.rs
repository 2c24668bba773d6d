#[macro_use]
extern crate rocket;
#[macro_use]
extern crate log;

mod config;
mod db;
mod guards;
mod models;
mod routes;
mod services;
mod utils;

use dotenvy::dotenv;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};

use crate::config::AppConfig;
use crate::guards::GuardFailure;

/* ----------------------------- CORS ----------------------------- */

pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            response.set_header(Header::new("Access-Control-Allow-Origin", origin));
        }

        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, PATCH, DELETE, OPTIONS",
        ));

        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));

        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/* ----------------------------- OPTIONS ----------------------------- */

#[options("/<_..>")]
fn options_handler() {}

/* ----------------------------- ERRORS ----------------------------- */

#[catch(401)]
fn unauthorized(req: &Request) -> rocket::serde::json::Value {
    let failure = req.local_cache(|| GuardFailure("Unauthorized"));
    rocket::serde::json::json!({
        "success": false,
        "message": failure.0
    })
}

#[catch(403)]
fn forbidden(req: &Request) -> rocket::serde::json::Value {
    let failure = req.local_cache(|| GuardFailure("Access denied"));
    rocket::serde::json::json!({
        "success": false,
        "message": failure.0
    })
}

#[catch(404)]
fn not_found() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Endpoint not found"
    })
}

#[catch(405)]
fn method_not_allowed() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Method not allowed"
    })
}

#[catch(500)]
fn internal_error() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Internal server error"
    })
}

/* ----------------------------- SWAGGER ----------------------------- */

fn swagger_config() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}

/* ----------------------------- LAUNCH ----------------------------- */

#[launch]
fn rocket() -> Rocket<Build> {
    dotenv().ok();
    env_logger::init();

    let app_config = AppConfig::load();

    info!("🌍 Travel Explorer API running");

    rocket::build()
        .attach(db::init(&app_config))
        .attach(CORS)
        .manage(app_config)
        .mount("/", routes![options_handler])
        .mount(
            "/api",
            routes![
                // Auth
                routes::auth::register,
                routes::auth::login,
                routes::auth::verify_session,
                // Packages
                routes::package::list_packages,
                routes::package::get_package,
                routes::package::create_package,
                routes::package::update_package,
                routes::package::delete_package,
                // Bookings
                routes::booking::create_booking,
                routes::booking::list_bookings,
                routes::booking::get_booking,
                routes::booking::update_booking_status,
                routes::booking::delete_booking,
                // Users (admin)
                routes::user::list_users,
                routes::user::get_user,
                routes::user::delete_user,
                // Admin
                routes::admin::get_stats,
                // Settings
                routes::settings::get_settings,
                routes::settings::update_settings,
                // System
                routes::system::seed,
                routes::system::clear_db,
                routes::system::health,
            ],
        )
        .mount("/api/docs", make_swagger_ui(&swagger_config()))
        .register(
            "/",
            catchers![
                unauthorized,
                forbidden,
                not_found,
                method_not_allowed,
                internal_error
            ],
        )
}
