//! RS256 token issuing and verification.
//!
//! Access and refresh tokens share one RSA key pair and differ only in the
//! `type` claim and lifetime.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rsa::RsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::config::{JwtConfig, Profile};

const RSA_KEY_BITS: usize = 2048;

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    #[error("Failed to read key file {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl JwtError {
    /// Machine-readable reason reported to clients on 401 responses.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Expired => "TOKEN_EXPIRED",
            _ => "INVALID_TOKEN",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                Self::InvalidKey(err.to_string())
            }
            _ => Self::Invalid(err.to_string()),
        }
    }
}

/// Value of the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    AccessToken,
    RefreshToken,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken => f.write_str("access_token"),
            Self::RefreshToken => f.write_str("refresh_token"),
        }
    }
}

/// Registered and private claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Time left until `exp`, rounded up to a whole second, zero when
    /// already past. A token is still accepted at `exp == now`, so that
    /// second counts.
    pub fn remaining_lifetime(&self) -> Duration {
        let left = self.exp.saturating_sub(Utc::now().timestamp()).saturating_add(1);
        Duration::from_secs(left.max(0) as u64)
    }
}

/// A freshly signed token and its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// PEM-encoded RSA key pair (PKCS#8 private, SPKI public).
#[derive(Clone)]
pub struct RsaKeyPair {
    pub private_pem: String,
    pub public_pem: String,
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("private_pem", &"***")
            .field("public_pem", &self.public_pem)
            .finish()
    }
}

impl RsaKeyPair {
    /// Generates a new 2048-bit key pair.
    pub fn generate() -> Result<Self, JwtError> {
        let mut rng = argon2::password_hash::rand_core::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
            .map_err(|e| JwtError::KeyGeneration(e.to_string()))?;

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| JwtError::KeyGeneration(e.to_string()))?
            .as_str()
            .to_owned();
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| JwtError::KeyGeneration(e.to_string()))?;

        Ok(Self {
            private_pem,
            public_pem,
        })
    }

    /// Reads both PEM files from disk.
    pub fn from_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, JwtError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| JwtError::KeyFile {
                path: path.display().to_string(),
                source,
            })
        };

        let pair = Self {
            private_pem: read(private_key_path.as_ref())?,
            public_pem: read(public_key_path.as_ref())?,
        };
        RsaPrivateKey::from_pkcs8_pem(&pair.private_pem)
            .map_err(|e| JwtError::InvalidKey(format!("private key is not PKCS#8 PEM: {e}")))?;
        Ok(pair)
    }
}

/// Signs and verifies access and refresh tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(
        keys: &RsaKeyPair,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(keys.private_pem.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(keys.public_pem.as_bytes())?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Builds the service from configuration.
    ///
    /// Without key paths an ephemeral pair is generated, which is refused in
    /// the `prod` profile: every restart would invalidate issued tokens.
    pub fn from_config(config: &JwtConfig, profile: Profile) -> Result<Self, JwtError> {
        let keys = match (&config.private_key_path, &config.public_key_path) {
            (Some(private), Some(public)) => RsaKeyPair::from_files(private, public)?,
            _ if profile.is_prod() => {
                return Err(JwtError::InvalidKey(
                    "RSA key files are required in the prod profile".to_string(),
                ));
            }
            _ => {
                warn!("RSA key paths not configured, generating an ephemeral key pair");
                RsaKeyPair::generate()?
            }
        };

        Self::new(
            &keys,
            Duration::from_secs(config.access_token_ttl_seconds),
            Duration::from_secs(config.refresh_token_ttl_seconds),
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access_token(&self, username: &str) -> Result<IssuedToken, JwtError> {
        self.issue(username, TokenType::AccessToken, self.access_ttl)
    }

    pub fn issue_refresh_token(&self, username: &str) -> Result<IssuedToken, JwtError> {
        self.issue(username, TokenType::RefreshToken, self.refresh_ttl)
    }

    fn issue(
        &self,
        username: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };
        let token = self.encode(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Signs arbitrary claims with the service key.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());

        encode(&header, claims, &self.encoding_key).map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Verifies the signature and expiry (no leeway) and returns the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
