use axum::http::HeaderMap;

use crate::config::Config;
use crate::errors::AppError;

pub const INTERNAL_SECRET_HEADER: &str = "x-internal-secret";

/// Checks the internal shared-secret header on service-to-service calls.
/// Missing or mismatched values are both reported as `Unauthorized`.
pub fn require_internal_secret(headers: &HeaderMap, config: &Config) -> Result<(), AppError> {
    let provided = headers
        .get(INTERNAL_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if provided != config.internal_api_secret {
        return Err(AppError::Unauthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_valid_secret_passes() {
        let mut headers = HeaderMap::new();
        headers.insert(INTERNAL_SECRET_HEADER, "secret".parse().unwrap());
        assert!(require_internal_secret(&headers, &test_config()).is_ok());
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            require_internal_secret(&headers, &test_config()),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(INTERNAL_SECRET_HEADER, "not-the-secret".parse().unwrap());
        assert!(matches!(
            require_internal_secret(&headers, &test_config()),
            Err(AppError::Unauthorized)
        ));
    }
}
