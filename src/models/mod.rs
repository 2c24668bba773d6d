pub mod booking;
pub mod package;
pub mod settings;
pub mod user;

pub use booking::*;
pub use package::*;
pub use settings::*;
pub use user::*;
