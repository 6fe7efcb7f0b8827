//! Bearer-token authentication.
//!
//! `POST /auth/login` verifies a username/password pair and issues an
//! HMAC-SHA256-signed expiring token. The middleware verifies the token on
//! every protected request, resolves the username into a [`Principal`] and
//! injects it as a request extension. Nothing is cached across requests.

use api_types::auth::{LoginRequest, TokenResponse};
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_TTL_SECS: i64 = 86_400; // 1 day

/// The resolved identity of the authenticated caller for one request.
#[derive(Clone, Debug)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
}

impl Principal {
    /// Caller identity as stored in owner columns.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Issues and verifies bearer tokens: `b64url(claims) . b64url(hmac)`.
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: secret.to_vec(),
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, serde_json::Error> {
        let claims = Claims {
            sub: username.to_string(),
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
        };
        let payload = serde_json::to_vec(&claims)?;
        let signature = self.sign(&payload);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Returns the subject of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (payload_b64, signature_b64) = token.split_once('.')?;
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

        // Constant-time comparison via the hmac crate.
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(&payload);
        mac.verify_slice(&signature).ok()?;

        let claims: Claims = serde_json::from_slice(&payload).ok()?;
        (claims.exp > Utc::now().timestamp()).then_some(claims.sub)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.key) else {
            // HMAC accepts keys of any length.
            return Vec::new();
        };
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Handles `POST /auth/login`.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ServerError> {
    let user = state
        .engine
        .verify_credentials(&payload.username, &payload.password)
        .await?;

    let token = state
        .tokens
        .issue(&user.username)
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    tracing::info!("user {} logged in", user.username);
    Ok(Json(TokenResponse { token }))
}

/// Middleware guarding every route except registration and login.
pub async fn require_auth(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(bearer)) = bearer else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let Some(username) = state.tokens.verify(bearer.token()) else {
        tracing::debug!("rejected invalid or expired bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = state
        .engine
        .principal(&username)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(Principal {
        id: user.id,
        username: user.username,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let signer = TokenSigner::new(b"secret");
        let token = signer.issue("alice").unwrap();
        assert_eq!(signer.verify(&token), Some("alice".to_string()));
    }

    #[test]
    fn token_rejected_with_different_key() {
        let signer = TokenSigner::new(b"secret");
        let other = TokenSigner::new(b"other-secret");
        let token = signer.issue("alice").unwrap();
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = TokenSigner::new(b"secret");
        let token = signer.issue("alice").unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = serde_json::to_vec(&Claims {
            sub: "bob".to_string(),
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
        })
        .unwrap();
        let forged = format!("{}.{}", URL_SAFE_NO_PAD.encode(forged_claims), signature);
        assert_eq!(signer.verify(&forged), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new(b"secret");
        let claims = Claims {
            sub: "alice".to_string(),
            exp: Utc::now().timestamp() - 1,
        };
        let payload = serde_json::to_vec(&claims).unwrap();
        let signature = signer.sign(&payload);
        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        );
        assert_eq!(signer.verify(&token), None);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let signer = TokenSigner::new(b"secret");
        assert_eq!(signer.verify(""), None);
        assert_eq!(signer.verify("no-dot"), None);
        assert_eq!(signer.verify("a.b"), None);
    }
}
