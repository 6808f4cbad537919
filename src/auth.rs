//! Bearer-token verification.
//!
//! Tokens are HS256 JWTs issued by the user service. Handlers receive the
//! resolved identity by taking a [`Caller`] argument.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::access::Caller;
use crate::errors::AppError;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default, alias = "id")]
    pub user_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "role")]
    pub user_type: Option<String>,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for `user_id`, valid for `ttl`.
    pub fn issue_token(
        &self,
        user_id: i32,
        user_type: &str,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            user_id: Some(user_id),
            username: None,
            email: None,
            user_type: Some(user_type.to_string()),
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("create JWT: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            log::debug!("rejected bearer token: {}", e);
            AppError::Forbidden("Invalid or expired token".to_string())
        })?;
        let claims = data.claims;
        Ok(Caller::new(claims.user_id, claims.user_type.as_deref()))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match (req.app_data::<web::Data<AuthKeys>>(), bearer_token(req)) {
            (None, _) => Err(AppError::Internal("auth keys are not configured".to_string())),
            (_, None) => Err(AppError::Unauthorized("Access token required".to_string())),
            (Some(keys), Some(token)) => keys.verify(token),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    fn keys() -> AuthKeys {
        AuthKeys::from_secret("test-secret")
    }

    #[test]
    fn issued_token_verifies_to_caller() {
        let keys = keys();
        let token = keys.issue_token(42, "admin", Duration::hours(1)).unwrap();
        let caller = keys.verify(&token).unwrap();

        assert_eq!(caller.user_id, Some(42));
        assert!(caller.is_admin);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = AuthKeys::from_secret("other")
            .issue_token(1, "customer", Duration::hours(1))
            .unwrap();
        assert!(matches!(keys().verify(&token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = keys()
            .issue_token(1, "customer", Duration::hours(-2))
            .unwrap();
        assert!(matches!(keys().verify(&token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn claims_accept_id_and_role_aliases() {
        let claims: Claims =
            serde_json::from_str(r#"{"id": 5, "role": "Admin", "exp": 1}"#).unwrap();
        assert_eq!(claims.user_id, Some(5));
        assert_eq!(claims.user_type.as_deref(), Some("Admin"));
    }

    #[actix_web::test]
    async fn extractor_requires_bearer_header() {
        let req = TestRequest::default()
            .app_data(web::Data::new(keys()))
            .to_http_request();
        let err = Caller::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let token = keys().issue_token(7, "customer", Duration::hours(1)).unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(keys()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();
        let caller = Caller::extract(&req).await.unwrap();
        assert_eq!(caller.user_id, Some(7));
        assert!(!caller.is_admin);
    }
}
