//! Stateless bearer credentials.
//!
//! Tokens use the JWT compact form with an HS256 signature:
//! `base64url(header).base64url(claims).base64url(hmac_sha256(secret, header.claims))`.
//! Nothing is stored server-side; validity is the signature plus `exp`.

use crate::domain::errors::{DomainError, DomainResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::Sha256;
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Identity carried by a token.
///
/// `user_id` and `role_id` are always present. Everything else the issuer
/// wants reflected back (login id, email, ...) lives in the open `extra` map,
/// so consumers must read those fields defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "roleId")]
    pub role_id: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(user_id: i64, role_id: i64) -> Self {
        Self {
            user_id,
            role_id,
            iat: 0,
            exp: 0,
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(name.to_string(), value.into());
        self
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    fn to_payload(&self) -> Value {
        let mut payload = self.extra.clone();
        // Reserved fields always win over same-named extras.
        payload.insert("userId".to_string(), json!(self.user_id));
        payload.insert("roleId".to_string(), json!(self.role_id));
        payload.insert("iat".to_string(), json!(self.iat));
        payload.insert("exp".to_string(), json!(self.exp));
        Value::Object(payload)
    }
}

#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
}

#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    pub fn issue_token(&self, claims: Claims) -> String {
        self.issue_token_at(claims, OffsetDateTime::now_utc())
    }

    /// Any `iat`/`exp` already present on `claims` is overwritten.
    pub fn issue_token_at(&self, mut claims: Claims, now: OffsetDateTime) -> String {
        claims.iat = now.unix_timestamp();
        // Clamped so an oversized lifetime cannot wrap into the past.
        claims.exp = claims.iat.saturating_add(self.lifetime_secs);

        let header = json!({ "alg": ALGORITHM, "typ": "JWT" });
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(claims.to_payload().to_string())
        );
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes()));

        format!("{}.{}", signing_input, signature)
    }

    pub fn verify_token(&self, token: &str) -> DomainResult<Claims> {
        self.verify_token_at(token, OffsetDateTime::now_utc())
    }

    /// Fails with `InvalidCredential` for a bad structure, unknown algorithm,
    /// signature mismatch or expiry, without saying which.
    pub fn verify_token_at(&self, token: &str, now: OffsetDateTime) -> DomainResult<Claims> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DomainError::InvalidCredential);
        };

        let header: Header = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(DomainError::InvalidCredential);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| DomainError::InvalidCredential)?;

        let mut mac = self.mac();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&signature)
            .map_err(|_| DomainError::InvalidCredential)?;

        let claims: Claims = decode_segment(payload_b64)?;
        if claims.exp <= now.unix_timestamp() {
            return Err(DomainError::InvalidCredential);
        }

        Ok(claims)
    }

    fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }
}

/// Reads the claims without checking signature or expiry.
///
/// For diagnostics only. Never use the result to make an access decision.
pub fn decode_token(token: &str) -> Option<Claims> {
    let payload_b64 = token.split('.').nth(1)?;
    decode_segment(payload_b64).ok()
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> DomainResult<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| DomainError::InvalidCredential)?;
    serde_json::from_slice(&bytes).map_err(|_| DomainError::InvalidCredential)
}
