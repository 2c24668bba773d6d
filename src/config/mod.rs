use rocket::figment::{Figment, providers::{Env, Format, Toml}};
use rocket::Config as RocketConfig;
use std::env;

/// Process configuration, loaded once at startup and managed as immutable
/// Rocket state. Values come from Rocket.toml (per profile) with
/// ROCKET_-prefixed environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiry: i64,
    pub development: bool,
}

impl AppConfig {
    fn figment() -> Figment {
        let profile = env::var("ROCKET_PROFILE").unwrap_or_else(|_| "development".to_string());

        Figment::from(RocketConfig::default())
            .merge(Toml::file("Rocket.toml").nested())
            .select(&profile)
            .merge(Env::prefixed("ROCKET_").split("_"))
    }

    pub fn load() -> Self {
        let figment = Self::figment();
        let profile = env::var("ROCKET_PROFILE").unwrap_or_else(|_| "development".to_string());

        AppConfig {
            mongodb_uri: figment
                .extract_inner("mongodb_uri")
                .unwrap_or_else(|_| "mongodb://localhost:27017/travel_explorer".to_string()),
            database_name: figment
                .extract_inner("database_name")
                .unwrap_or_else(|_| "travel_explorer".to_string()),
            jwt_secret: figment
                .extract_inner("jwt_secret")
                .unwrap_or_else(|_| "default-secret".to_string()),
            // 7 days
            jwt_expiry: figment.extract_inner("jwt_expiry").unwrap_or(604800),
            development: profile == "development",
        }
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        AppConfig {
            mongodb_uri: "mongodb://localhost:27017/travel_explorer_test".to_string(),
            database_name: "travel_explorer_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiry: 604800,
            development: true,
        }
    }
}
