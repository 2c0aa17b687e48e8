//! JWT Token Service
//!
//! Issues and validates RS256 bearer tokens. The header carries a key id so a
//! second key pair can be introduced later without invalidating old tokens
//! silently.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// JWT Claims structure containing the user id and token metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User unique identifier
    pub sub: String,
    /// Token issuer
    pub iss: String,
    /// Intended audience
    pub aud: String,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issued at timestamp
    pub iat: i64,
    /// Not valid before this timestamp
    pub nbf: i64,
}

/// Why a token was refused. All of these surface as 401 to clients.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid RSA key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("unexpected signing method: alg={alg:?}, kid={kid:?}")]
    UnexpectedHeader { alg: Algorithm, kid: Option<String> },
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("token issued in the future")]
    IssuedInFuture,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("audience mismatch")]
    AudienceMismatch,
    #[error("issuer mismatch")]
    IssuerMismatch,
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAudience => Self::AudienceMismatch,
            ErrorKind::InvalidIssuer => Self::IssuerMismatch,
            _ => Self::Malformed(e.to_string()),
        }
    }
}

/// Issuer/audience/lifetime settings independent of where the keys come from
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub key_id: String,
    pub validity: std::time::Duration,
    pub leeway: std::time::Duration,
}

impl From<&JwtConfig> for TokenSettings {
    fn from(config: &JwtConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            key_id: config.key_id.clone(),
            validity: config.validity,
            leeway: config.leeway,
        }
    }
}

/// Signs and validates tokens with one RSA key pair
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    settings: TokenSettings,
}

impl TokenIssuer {
    /// Build an issuer from PEM encoded RSA keys
    pub fn new(
        private_pem: &[u8],
        public_pem: &[u8],
        settings: TokenSettings,
    ) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem).map_err(TokenError::InvalidKey)?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem).map_err(TokenError::InvalidKey)?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = settings.leeway.as_secs();

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            settings,
        })
    }

    /// Seconds a freshly issued token stays valid
    pub fn validity_secs(&self) -> u64 {
        self.settings.validity.as_secs()
    }

    /// Generate a signed token for a user
    pub fn generate(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.generate_at(user_id, Utc::now())
    }

    fn generate_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let validity = Duration::from_std(self.settings.validity)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + validity).timestamp(),
        };

        let mut header = Header::new(SIGNING_ALGORITHM);
        header.kid = Some(self.settings.key_id.clone());

        encode(&header, &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Validate a token and return its claims
    pub fn validate_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token)?;
        if header.alg != SIGNING_ALGORITHM || header.kid.as_deref() != Some(self.settings.key_id.as_str()) {
            return Err(TokenError::UnexpectedHeader {
                alg: header.alg,
                kid: header.kid,
            });
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        // jsonwebtoken leaves iat unchecked
        let leeway = self.settings.leeway.as_secs() as i64;
        if claims.iat > Utc::now().timestamp() + leeway {
            return Err(TokenError::IssuedInFuture);
        }
        Ok(claims)
    }

    /// Validate a token and return the embedded user id
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_claims(token).map(|claims| claims.sub)
    }

    /// [`Self::validate`] for callers that need the id as a [`Uuid`]
    pub fn validate_user_id(&self, token: &str) -> Result<Uuid, TokenError> {
        let sub = self.validate(token)?;
        Uuid::parse_str(&sub).map_err(|e| TokenError::Malformed(e.to_string()))
    }
}
