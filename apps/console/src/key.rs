use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use labfed_database::{Claims, User};

pub struct KeyContext {
    jwt_encode: EncodingKey,
    jwt_decode: DecodingKey,
}

impl KeyContext {
    pub fn new(key: &str) -> Self {
        let jwt_encode = EncodingKey::from_secret(key.as_bytes());
        let jwt_decode = DecodingKey::from_secret(key.as_bytes());
        Self {
            jwt_encode,
            jwt_decode,
        }
    }

    pub fn sign_jwt(&self, user: &User, expires_in: Duration) -> String {
        let claims = Claims {
            exp: Utc::now().naive_utc() + expires_in,
            user: user.clone(),
        };
        encode(&Header::default(), &claims, &self.jwt_encode).expect("encode JWT error")
    }

    pub fn decode_jwt(&self, token: &str) -> Option<Claims> {
        if let Ok(res) = decode::<Claims>(token, &self.jwt_decode, &Validation::default()) {
            Some(res.claims)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDateTime;
    use labfed_database::AccessLevel;

    fn test_user() -> User {
        User {
            id: "user1".into(),
            login: "admin".into(),
            name: "Administrator".into(),
            access_level: AccessLevel::Admin,
            lms_id: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_sign_and_decode() {
        let key = KeyContext::new("test-sign-key");
        let token = key.sign_jwt(&test_user(), Duration::seconds(3600));

        let claims = key.decode_jwt(&token).unwrap();
        assert_eq!(claims.user.login, "admin");
        assert!(claims.user.access_level.can_admin());
    }

    #[test]
    fn test_decode_with_wrong_key() {
        let key = KeyContext::new("test-sign-key");
        let token = key.sign_jwt(&test_user(), Duration::seconds(3600));

        let other = KeyContext::new("another-key");
        assert!(other.decode_jwt(&token).is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let key = KeyContext::new("test-sign-key");
        let token = key.sign_jwt(&test_user(), Duration::seconds(-3600));
        assert!(key.decode_jwt(&token).is_none());
    }
}
