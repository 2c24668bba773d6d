pub mod response;
pub mod validation;

pub use response::{ApiError, ApiResponse, Created};
pub use validation::{parse_stay_date, validate_email, validate_stay};
