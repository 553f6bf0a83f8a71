//! Credential holder and request authentication.
//!
//! A [`Signer`] keeps the private key, key identifier and optional bearer
//! token for the lifetime of a client. Transports ask it for the headers to
//! attach to each outgoing request:
//!
//! - with a token: `Authorization: Bearer <token>`
//! - without: an HTTP Signature over the `Date` header, signed with the
//!   private key (`rsa-sha256` for RSA keys, `ecdsa-sha256` for P-256 keys)

use crate::cloudapi::config::ClientConfig;
use crate::cloudapi::types::FetchError;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey};
use once_cell::sync::OnceCell;
use secrecy::{ExposeSecret, SecretBox, SecretString};
use std::fmt;

/// Private key parsed into a form jsonwebtoken can sign with
struct SigningKey {
    algorithm: Algorithm,
    /// Algorithm name used in the `Signature` header
    name: &'static str,
    key: EncodingKey,
}

/// Credential material used to authenticate every request
pub struct Signer {
    key: SecretBox<Vec<u8>>,
    key_id: String,
    token: Option<SecretString>,
    /// Parsed on first signature; a parse failure is kept and reported per call
    signing_key: OnceCell<Result<SigningKey, String>>,
}

impl Signer {
    pub fn new(
        key: impl Into<Vec<u8>>,
        key_id: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            key: SecretBox::new(Box::new(key.into())),
            key_id: key_id.into(),
            token: token.map(SecretString::from),
            signing_key: OnceCell::new(),
        }
    }

    /// Take the credentials out of a validated configuration
    pub(crate) fn from_config(config: &mut ClientConfig) -> Self {
        Self {
            key: config
                .key
                .take()
                .unwrap_or_else(|| SecretBox::new(Box::default())),
            key_id: config.key_id.clone(),
            token: config.token.take(),
            signing_key: OnceCell::new(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The bearer token, if one was configured
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret())
    }

    pub fn key(&self) -> &[u8] {
        self.key.expose_secret()
    }

    /// Headers authenticating a request sent now
    pub fn auth_headers(&self) -> Result<Vec<(String, String)>, FetchError> {
        self.auth_headers_at(Utc::now())
    }

    /// Headers authenticating a request sent at `now`
    pub fn auth_headers_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, FetchError> {
        if let Some(token) = self.token() {
            return Ok(vec![(
                "Authorization".to_string(),
                format!("Bearer {}", token),
            )]);
        }

        let date = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let (algorithm, signature) = self.sign(format!("date: {}", date).as_bytes())?;

        let authorization = format!(
            "Signature keyId=\"{}\",algorithm=\"{}\",headers=\"date\",signature=\"{}\"",
            self.key_id, algorithm, signature
        );

        Ok(vec![
            ("Date".to_string(), date),
            ("Authorization".to_string(), authorization),
        ])
    }

    fn signing_key(&self) -> Result<&SigningKey, FetchError> {
        self.signing_key
            .get_or_init(|| load_signing_key(self.key()))
            .as_ref()
            .map_err(|msg| FetchError::Signing(msg.clone()))
    }

    /// Sign `message`, returning the algorithm name and base64 signature
    fn sign(&self, message: &[u8]) -> Result<(&'static str, String), FetchError> {
        let signing_key = self.signing_key()?;

        let signature =
            jsonwebtoken::crypto::sign(message, &signing_key.key, signing_key.algorithm)?;

        // jsonwebtoken emits base64url; HTTP signatures use standard base64
        let raw = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| FetchError::Signing(format!("Invalid signature encoding: {}", e)))?;

        let bytes = match signing_key.algorithm {
            Algorithm::ES256 => ecdsa_der(&raw)?,
            _ => raw,
        };

        Ok((signing_key.name, STANDARD.encode(bytes)))
    }
}

/// Parse a PEM private key, trying RSA first and then P-256
fn load_signing_key(pem: &[u8]) -> Result<SigningKey, String> {
    match EncodingKey::from_rsa_pem(pem) {
        Ok(key) => Ok(SigningKey {
            algorithm: Algorithm::RS256,
            name: "rsa-sha256",
            key,
        }),
        Err(rsa_err) => match EncodingKey::from_ec_pem(pem) {
            Ok(key) => Ok(SigningKey {
                algorithm: Algorithm::ES256,
                name: "ecdsa-sha256",
                key,
            }),
            Err(_) => {
                tracing::error!("Failed to load signing key: {}", rsa_err);
                Err(format!("Unsupported or invalid private key: {}", rsa_err))
            }
        },
    }
}

/// Re-encode a fixed-width `r || s` ECDSA signature as an ASN.1 DER SEQUENCE
fn ecdsa_der(raw: &[u8]) -> Result<Vec<u8>, FetchError> {
    if raw.len() != 64 {
        return Err(FetchError::Signing(format!(
            "Unexpected ECDSA signature length: {}",
            raw.len()
        )));
    }

    let (r, s) = raw.split_at(32);
    let r = der_integer(r);
    let s = der_integer(s);

    // At most 2 * 35 bytes, so the short length form always applies
    let mut der = Vec::with_capacity(2 + r.len() + s.len());
    der.push(0x30);
    der.push((r.len() + s.len()) as u8);
    der.extend_from_slice(&r);
    der.extend_from_slice(&s);
    Ok(der)
}

/// DER INTEGER for an unsigned big-endian value
fn der_integer(bytes: &[u8]) -> Vec<u8> {
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    let value = &bytes[start..];

    let mut out = vec![0x02];
    if value.first().is_some_and(|b| b & 0x80 != 0) {
        out.push(value.len() as u8 + 1);
        out.push(0x00);
    } else {
        out.push(value.len() as u8);
    }
    out.extend_from_slice(value);
    out
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("key", &"[REDACTED]")
            .field("key_id", &self.key_id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
