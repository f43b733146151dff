use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

use crate::errors::AppError;

use super::models::TokenClaims;

/// Name of the HttpOnly cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

pub const ACCESS_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Create a new JWT access token for a user
pub fn create_access_token(user_id: Uuid, jwt_secret: &Secret<String>) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(ACCESS_TOKEN_EXPIRY_DAYS);

    let claims = TokenClaims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Failed to create access token: {e}")))
}

/// Decode and validate a JWT access token
pub fn decode_token(token: &str, jwt_secret: &Secret<String>) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token.".to_string()))
}

/// Token from the `access_token` cookie, falling back to a Bearer header
pub fn extract_token(req: &HttpRequest) -> Result<String, AppError> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::Unauthorized("Authentication required.".to_string()))
}

/// HttpOnly, SameSite=Strict cookie holding the access token
pub fn auth_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::days(ACCESS_TOKEN_EXPIRY_DAYS))
        .finish()
}

/// Cookie that instructs the browser to drop the access token
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn secret(value: &str) -> Secret<String> {
        Secret::new(value.to_string())
    }

    #[test]
    fn test_create_and_decode_token() {
        let user_id = Uuid::new_v4();
        let jwt_secret = secret("test_secret_key_for_testing");

        let token = create_access_token(user_id, &jwt_secret).expect("Should create token");
        assert_eq!(token.split('.').count(), 3, "JWT should have 3 parts");

        let claims = decode_token(&token, &jwt_secret).expect("Should decode token");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_token_expires_in_seven_days() {
        let jwt_secret = secret("test_secret_key");
        let token = create_access_token(Uuid::new_v4(), &jwt_secret).unwrap();
        let claims = decode_token(&token, &jwt_secret).unwrap();

        let now = Utc::now().timestamp() as usize;
        let expected_exp = now + 7 * 24 * 60 * 60;
        assert!(claims.exp >= expected_exp - 5 && claims.exp <= expected_exp + 5);
        assert!(claims.iat >= now - 5 && claims.iat <= now + 5);
    }

    #[test]
    fn test_decode_token_wrong_secret() {
        let token = create_access_token(Uuid::new_v4(), &secret("correct_secret")).unwrap();
        let result = decode_token(&token, &secret("wrong_secret"));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_decode_token_garbage() {
        assert!(decode_token("invalid.token.here", &secret("s")).is_err());
    }

    #[test]
    fn test_extract_token_prefers_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"))
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(extract_token(&req).unwrap(), "from-cookie");
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(extract_token(&req).unwrap(), "from-header");
    }

    #[test]
    fn test_extract_token_missing() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(extract_token(&req), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("abc".to_string(), true);
        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }
}
