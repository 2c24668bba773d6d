use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey};
use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;

use crate::config::AppConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: i64,
    pub iat: i64,
}

/// Session issuer: signed, time-limited tokens binding a user id.
/// There is no server-side session store; the token is the session.
pub struct JwtService;

impl JwtService {
    pub fn issue(
        config: &AppConfig,
        user_id: &ObjectId,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_hex(),
            exp: now + config.jwt_expiry,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
    }

    pub fn validate(
        config: &AppConfig,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn issued_token_round_trips_to_the_same_user_id() {
        let config = AppConfig::for_tests();
        let user_id = ObjectId::new();

        let token = JwtService::issue(&config, &user_id).unwrap();
        let claims = JwtService::validate(&config, &token).unwrap();

        assert_eq!(claims.sub, user_id.to_hex());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_fails_as_expired_not_invalid() {
        let config = AppConfig::for_tests();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: ObjectId::new().to_hex(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = JwtService::validate(&config, &token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn malformed_token_is_rejected_with_a_different_kind() {
        let config = AppConfig::for_tests();

        let err = JwtService::validate(&config, "definitely-not-a-jwt").unwrap_err();
        assert!(!matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let config = AppConfig::for_tests();
        let other = AppConfig {
            jwt_secret: "some-other-secret".to_string(),
            ..AppConfig::for_tests()
        };

        let token = JwtService::issue(&other, &ObjectId::new()).unwrap();
        assert!(JwtService::validate(&config, &token).is_err());
    }
}
