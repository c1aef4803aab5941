use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use abi::errors::Error;
use abi::model::UserInfo;

mod auth_handlers;
mod token_handlers;
mod user_handlers;

pub use auth_handlers::*;
pub use token_handlers::*;
pub use user_handlers::*;

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// profile plus a fresh bearer token
#[derive(Serialize, Debug)]
pub struct UserWithToken {
    pub user: UserInfo,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

const EXPIRES: i64 = 24 * 60 * 60;

impl Claims {
    pub fn new(sub: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        let exp = now + EXPIRES;
        Self { sub, exp, iat: now }
    }
}

pub fn gen_token(jwt_secret: &str, user_id: &str) -> Result<String, Error> {
    let claims = Claims::new(user_id.to_string());
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    use super::*;

    #[test]
    fn token_carries_user_id_for_a_day() {
        let token = gen_token("secret", "user-1").unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "user-1");
        assert_eq!(data.claims.exp - data.claims.iat, EXPIRES);

        assert!(decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other"),
            &Validation::default()
        )
        .is_err());
    }
}
