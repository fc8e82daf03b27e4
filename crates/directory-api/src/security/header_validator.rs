use crate::utils::error::ApiError;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Static shared-secret check on the `X-API-Key` header
#[derive(Debug, Clone)]
pub struct ApiKeyValidator {
    expected_api_key: String,
}

impl ApiKeyValidator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            expected_api_key: api_key.into(),
        }
    }

    pub fn validate(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let api_key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("Missing {} header", API_KEY_HEADER);
                ApiError::Forbidden("Could not validate credentials".to_string())
            })?;

        if !bool::from(api_key.as_bytes().ct_eq(self.expected_api_key.as_bytes())) {
            warn!("Invalid {}", API_KEY_HEADER);
            return Err(ApiError::Forbidden(
                "Could not validate credentials".to_string(),
            ));
        }

        debug!("API key validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers(key: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = key {
            headers.insert("x-api-key", HeaderValue::from_static(key));
        }
        headers
    }

    #[test]
    fn test_valid_key() {
        let validator = ApiKeyValidator::new("secret");
        assert!(validator.validate(&headers(Some("secret"))).is_ok());
    }

    #[test]
    fn test_missing_or_wrong_key() {
        let validator = ApiKeyValidator::new("secret");
        assert!(matches!(
            validator.validate(&headers(None)),
            Err(ApiError::Forbidden(_))
        ));
        assert!(validator.validate(&headers(Some("secreT"))).is_err());
        assert!(validator.validate(&headers(Some("secret2"))).is_err());
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::try_from("X-API-KEY").unwrap(),
            HeaderValue::from_static("secret"),
        );
        assert!(ApiKeyValidator::new("secret").validate(&map).is_ok());
    }
}
