pub mod jwt;
pub mod stats;

pub use jwt::JwtService;
