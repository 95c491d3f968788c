//! Bearer header parsing.

use axum::http::{HeaderMap, header};

use super::errors::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// A missing, empty or non-UTF-8 header is `AuthorizationHeaderMissing`; a header
/// without the `Bearer ` prefix or with nothing after it is `TokenMissing`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::AuthorizationHeaderMissing)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(AuthError::TokenMissing)?;

    if token.is_empty() {
        return Err(AuthError::TokenMissing);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_simple() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_no_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::AuthorizationHeaderMissing)
        ));
    }

    #[test]
    fn test_empty_header() {
        let headers = headers_with("");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::AuthorizationHeaderMissing)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(bearer_token(&headers), Err(AuthError::TokenMissing)));
    }

    #[test]
    fn test_empty_token() {
        let headers = headers_with("Bearer    ");
        assert!(matches!(bearer_token(&headers), Err(AuthError::TokenMissing)));
    }
}
