//! Admin authentication.
//!
//! There is a single admin principal. Logging in with the configured password
//! yields a signed bearer token of the form
//! `base64url(claims) "." base64url(hmac_sha256(secret, claims_segment))`,
//! where the claims carry the role and an expiry in Unix seconds.

use argon2::{
    password_hash::{rand_core::OsRng, rand_core::RngCore, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::app_state::AppState;
use crate::errors::ServerError;
use crate::secrets::get_secret;

type HmacSha256 = Hmac<Sha256>;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone)]
pub enum AdminPassword {
    /// Argon2 PHC string.
    Hash(String),
    Plain(String),
    Unset,
}

impl AdminPassword {
    /// `ADMIN_PASSWORD_HASH` wins; `ADMIN_PASSWORD` may hold either a PHC
    /// string or plaintext.
    pub fn from_values(hash: Option<String>, password: Option<String>) -> Self {
        if let Some(hash) = hash {
            return AdminPassword::Hash(hash);
        }
        match password {
            Some(p) if looks_hashed(&p) => AdminPassword::Hash(p),
            Some(p) => AdminPassword::Plain(p),
            None => AdminPassword::Unset,
        }
    }
}

fn looks_hashed(value: &str) -> bool {
    value.starts_with("$argon2")
}

pub struct AuthSettings {
    admin_password: AdminPassword,
    token_secret: Vec<u8>,
    pub token_ttl_seconds: u64,
}

impl AuthSettings {
    pub fn new(
        admin_password: AdminPassword,
        token_secret: impl Into<Vec<u8>>,
        token_ttl_seconds: u64,
    ) -> Self {
        Self {
            admin_password,
            token_secret: token_secret.into(),
            token_ttl_seconds,
        }
    }

    pub fn from_secrets(token_ttl_seconds: u64) -> Self {
        let admin_password = AdminPassword::from_values(
            get_secret("ADMIN_PASSWORD_HASH"),
            get_secret("ADMIN_PASSWORD"),
        );
        if matches!(admin_password, AdminPassword::Unset) {
            tracing::warn!("no admin password configured; every login will be rejected");
        }

        let token_secret = match get_secret("TOKEN_SECRET") {
            Some(secret) => secret.into_bytes(),
            None => {
                tracing::warn!("TOKEN_SECRET not set; using a per-process secret");
                generate_secret()
            }
        };

        Self::new(admin_password, token_secret, token_ttl_seconds)
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        match &self.admin_password {
            AdminPassword::Hash(hash) => verify_password(hash, candidate).is_ok(),
            AdminPassword::Plain(expected) => {
                // Compare MACs so the comparison runs in constant time.
                let Ok(expected_mac) = self.sign(expected.as_bytes()) else {
                    return false;
                };
                let Ok(mut mac) = HmacSha256::new_from_slice(&self.token_secret) else {
                    return false;
                };
                mac.update(candidate.as_bytes());
                mac.verify_slice(&expected_mac).is_ok()
            }
            AdminPassword::Unset => false,
        }
    }

    pub fn issue_token(&self, now: i64) -> Result<String, TokenError> {
        let claims = AdminClaims {
            role: ADMIN_ROLE.to_string(),
            iat: now,
            exp: now.saturating_add(self.token_ttl_seconds as i64),
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let claims_segment = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.sign(claims_segment.as_bytes())?;

        Ok(format!(
            "{claims_segment}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    pub fn verify_token(&self, token: &str, now: i64) -> Result<AdminClaims, TokenError> {
        let (claims_segment, signature_segment) =
            token.split_once('.').ok_or(TokenError::Malformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac =
            HmacSha256::new_from_slice(&self.token_secret).map_err(|_| TokenError::Malformed)?;
        mac.update(claims_segment.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Signature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(claims_segment)
            .map_err(|_| TokenError::Malformed)?;
        let claims: AdminClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.role != ADMIN_ROLE {
            return Err(TokenError::Role);
        }
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.token_secret).map_err(|_| TokenError::Malformed)?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    Signature,
    #[error("token expired")]
    Expired,
    #[error("token role not allowed")]
    Role,
}

/// Guard for protected routes.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<AdminClaims, ServerError> {
    let token = bearer_token(headers)?;
    state
        .auth
        .verify_token(&token, now_unix())
        .map_err(|e| {
            tracing::debug!(reason = %e, "bearer token rejected");
            ServerError::unauthorized("Token invalid or expired")
        })
}

pub fn bearer_token(headers: &HeaderMap) -> Result<String, ServerError> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let token = value.strip_prefix("Bearer ").unwrap_or("").trim();
    if token.is_empty() {
        return Err(ServerError::unauthorized("Not authorized"));
    }
    Ok(token.to_string())
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("password hash error: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(hash: &str, password: &str) -> Result<(), String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("password hash parse error: {e}"))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| format!("password verify error: {e}"))
}

pub fn generate_secret() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(password: AdminPassword) -> AuthSettings {
        AuthSettings::new(password, b"test-secret".to_vec(), 3_600)
    }

    #[test]
    fn token_round_trip_and_expiry() {
        let auth = settings(AdminPassword::Unset);
        let token = auth.issue_token(1_000).expect("token");

        let claims = auth.verify_token(&token, 1_500).expect("valid");
        assert_eq!(claims.role, ADMIN_ROLE);
        assert_eq!(claims.exp, 4_600);

        assert_eq!(auth.verify_token(&token, 4_600), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = settings(AdminPassword::Unset).issue_token(0).expect("token");
        let other = AuthSettings::new(AdminPassword::Unset, b"another".to_vec(), 3_600);
        assert_eq!(other.verify_token(&token, 1), Err(TokenError::Signature));
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let auth = settings(AdminPassword::Unset);
        let token = auth.issue_token(0).expect("token");
        let (_, sig) = token.split_once('.').expect("two segments");
        let forged_claims = URL_SAFE_NO_PAD.encode(br#"{"role":"admin","iat":0,"exp":99999999999}"#);
        let forged = format!("{forged_claims}.{sig}");
        assert_eq!(auth.verify_token(&forged, 1), Err(TokenError::Signature));
        assert_eq!(auth.verify_token("garbage", 1), Err(TokenError::Malformed));
    }

    #[test]
    fn plaintext_and_hashed_passwords() {
        let plain = settings(AdminPassword::Plain("hunter2".into()));
        assert!(plain.check_password("hunter2"));
        assert!(!plain.check_password("hunter3"));

        let hash = hash_password("hunter2").expect("hash");
        let hashed = settings(AdminPassword::from_values(None, Some(hash)));
        assert!(matches!(hashed.admin_password, AdminPassword::Hash(_)));
        assert!(hashed.check_password("hunter2"));
        assert!(!hashed.check_password("nope"));

        assert!(!settings(AdminPassword::Unset).check_password(""));
    }

    #[test]
    fn hash_setting_takes_priority() {
        let pw = AdminPassword::from_values(Some("$argon2id$x".into()), Some("plain".into()));
        assert!(matches!(pw, AdminPassword::Hash(h) if h == "$argon2id$x"));
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic abc".parse().expect("header"),
        );
        assert!(bearer_token(&headers).is_err());

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc.def".parse().expect("header"),
        );
        assert_eq!(bearer_token(&headers).expect("token"), "abc.def");
    }
}
