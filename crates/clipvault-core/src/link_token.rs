//! Signed link token binding a blob's file ID to the metadata completion step.
//!
//! Tokens are HS256 JWTs with claims `{FileID, iat, nbf}`. There is no `exp` claim; the
//! only time window is "not before", placed slightly in the past at issuance so clock
//! skew between nodes does not reject fresh tokens.
//!
//! Verification checks the signature over the raw `header.claims` text before decoding
//! anything, so any altered byte is reported as a signature mismatch rather than as a
//! parse failure.

use crate::config::LinkTokenConfig;
use crate::AppError;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey, Header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinkTokenError {
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token not valid before {not_before}")]
    NotYetValid { not_before: i64 },

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<LinkTokenError> for AppError {
    fn from(err: LinkTokenError) -> Self {
        match err {
            LinkTokenError::InvalidSignature(msg) => AppError::InvalidSignature(msg),
            LinkTokenError::Malformed(msg) => AppError::MalformedToken(msg),
            LinkTokenError::NotYetValid { not_before } => {
                AppError::NotYetValid(format!("token is valid from {}", not_before))
            }
            LinkTokenError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkClaims {
    #[serde(rename = "FileID")]
    file_id: String,
    iat: i64,
    nbf: i64,
}

/// Mints and verifies link tokens with a secret injected at construction.
#[derive(Clone)]
pub struct LinkTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    not_before_skew: Duration,
}

impl LinkTokenCodec {
    pub fn new(secret: &[u8], not_before_skew: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            not_before_skew,
        }
    }

    pub fn from_config(config: &LinkTokenConfig) -> Self {
        Self::new(
            config.secret.as_bytes(),
            Duration::seconds(config.not_before_skew_secs),
        )
    }

    /// Mint a token for `file_id`, valid from `now - not_before_skew` with no expiry.
    pub fn mint(&self, file_id: &str, now: DateTime<Utc>) -> Result<String, LinkTokenError> {
        let claims = LinkClaims {
            file_id: file_id.to_string(),
            iat: now.timestamp(),
            nbf: (now - self.not_before_skew).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| LinkTokenError::Signing(e.to_string()))
    }

    /// Verify `token` at `now` and return the embedded file ID.
    ///
    /// Does not check that the blob still exists.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, LinkTokenError> {
        let (message, signature) = token.rsplit_once('.').ok_or_else(|| {
            LinkTokenError::InvalidSignature("token has no signature segment".to_string())
        })?;

        let signature_matches =
            crypto::verify(signature, message.as_bytes(), &self.decoding_key, ALGORITHM)
                .map_err(|e| LinkTokenError::InvalidSignature(e.to_string()))?;
        if !signature_matches {
            return Err(LinkTokenError::InvalidSignature(
                "signature does not match".to_string(),
            ));
        }

        let (header_segment, claims_segment) = message
            .split_once('.')
            .ok_or_else(|| LinkTokenError::Malformed("token has no claims segment".to_string()))?;

        let header: Header = decode_segment(header_segment)?;
        if header.alg != ALGORITHM {
            return Err(LinkTokenError::Malformed(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let claims: LinkClaims = decode_segment(claims_segment)?;
        if now.timestamp() < claims.nbf {
            return Err(LinkTokenError::NotYetValid {
                not_before: claims.nbf,
            });
        }

        Ok(claims.file_id)
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, LinkTokenError> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| LinkTokenError::Malformed(format!("invalid base64 segment: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| LinkTokenError::Malformed(format!("invalid token JSON: {}", e)))
}
