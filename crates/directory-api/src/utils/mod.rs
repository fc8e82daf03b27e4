pub mod error;
pub mod extract;

pub use error::ApiError;
pub use extract::{ApiPath, ApiQuery};
