use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

impl Claim {
    pub fn new(uid: i32, ttl: chrono::Duration) -> Result<Self, Error> {
        let exp = chrono::Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::ServerError(format!("token ttl {} out of range", ttl)))?;
        Ok(Self {
            user: uid.to_string(),
            exp: exp.timestamp(),
        })
    }
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}

#[derive(Clone)]
pub struct JWT {
    secret: Vec<u8>,
    ttl: chrono::Duration,
}

impl JWT {
    pub fn new(secret: Vec<u8>, ttl: chrono::Duration) -> Self {
        Self { secret, ttl }
    }

    /// A signed token for `uid` that expires after the configured ttl.
    pub fn token_for(&self, uid: i32) -> Result<String, Error> {
        self.gen_token(&Claim::new(uid, self.ttl)?)
    }

    pub fn user_id(&self, token: &str) -> Result<i32, Error> {
        let claim: Claim = self.verify_token(token)?;
        Ok(claim.user().parse()?)
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, payload, &key)?;
        Ok(token)
    }
    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let validation = Validation::new(Algorithm::HS256);
        let payload = decode(token, &key, &validation)?;
        Ok(payload.claims)
    }
}
