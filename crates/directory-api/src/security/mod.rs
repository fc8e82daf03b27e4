pub mod header_validator;
pub mod middleware;

pub use header_validator::{ApiKeyValidator, API_KEY_HEADER};
pub use middleware::security_middleware;
