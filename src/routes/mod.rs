pub mod admin;
pub mod auth;
pub mod booking;
pub mod package;
pub mod settings;
pub mod system;
pub mod user;
