use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Named operations a token can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    GetInvoices,
    GetInvoice,
    CreateInvoice,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::GetInvoices,
        Permission::GetInvoice,
        Permission::CreateInvoice,
    ];

    /// Claim name as it appears in the token payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::GetInvoices => "getInvoices",
            Permission::GetInvoice => "getInvoice",
            Permission::CreateInvoice => "createInvoice",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission name to boolean, as carried by a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet(BTreeMap<String, bool>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim set granting every known permission.
    pub fn all() -> Self {
        Permission::ALL.iter().copied().collect()
    }

    pub fn grant(mut self, permission: Permission) -> Self {
        self.0.insert(permission.as_str().to_string(), true);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, granted: bool) {
        self.0.insert(name.into(), granted);
    }

    /// True only when the claim is present and strictly `true`.
    pub fn allows(&self, permission: &str) -> bool {
        self.0.get(permission).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &bool)> {
        self.0.iter()
    }
}

impl FromIterator<Permission> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(ClaimSet::new(), ClaimSet::grant)
    }
}

/// Wire form of the token payload: standard claims plus free-form permission claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    pub fn new(permissions: &ClaimSet, ttl: Duration) -> Self {
        let now = Utc::now();
        let extra = permissions
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(name, granted)| (name.clone(), Value::Bool(*granted)))
            .collect();

        Self {
            exp: Some((now + ttl).timestamp()),
            iat: Some(now.timestamp()),
            extra,
        }
    }

    /// Boolean claims only; anything else in the payload is not a permission.
    pub fn permissions(&self) -> ClaimSet {
        let mut set = ClaimSet::new();
        for (name, value) in &self.extra {
            if let Value::Bool(granted) = value {
                set.set(name.clone(), *granted);
            }
        }
        set
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid JWT token")]
    InvalidToken(String),
    #[error("Invalid or expired JWT token")]
    Expired(String),
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Verifies HMAC-signed bearer tokens against one shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.leeway = 0;

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify a raw `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(AuthError::MissingHeader)?;

        let token = strip_bearer(header);
        if token.is_empty() {
            return Err(AuthError::InvalidToken("empty bearer token".to_string()));
        }

        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidSubject => AuthError::Expired(e.to_string()),
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

/// Strip a case-insensitive `Bearer` scheme; a bare token passes through.
fn strip_bearer(header: &str) -> &str {
    match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => header,
    }
}

pub fn generate_jwt(secret: &str, permissions: &ClaimSet, ttl: Duration) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    encode(&header, &Claims::new(permissions, ttl), &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
