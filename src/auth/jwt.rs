use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn token(secret: &str, exp_offset: i64) -> String {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
        let claims = Claims {
            id: 5,
            email: "ana@example.com".into(),
            tip_uporabnika_id: 2,
            exp: (now + exp_offset) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_token_signed_with_same_secret() {
        let claims = verify_token(&token("s3cret", 600), "s3cret").unwrap();
        assert_eq!(claims.id, 5);
        assert_eq!(claims.email, "ana@example.com");
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        assert!(verify_token(&token("s3cret", 600), "other").is_err());
        assert!(verify_token(&token("s3cret", -600), "s3cret").is_err());
    }
}
