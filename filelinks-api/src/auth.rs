//! Authentication
//!
//! A caller presents either an API key (`X-API-Key`) or a JWT bearer token
//! (`Authorization: Bearer`). Whoever authenticates becomes the creator of
//! every file link in the batch, so two credentials never share a principal.

use crate::error::{ApiError, ApiResult};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

const INSECURE_DEFAULT_SECRET: &str = "INSECURE_DEFAULT_SECRET_CHANGE_IN_PRODUCTION";

/// Minimum secret length accepted in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

// ============================================================================
// JWT SECRET
// ============================================================================

/// HMAC secret for bearer tokens. Redacted in debug output.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> ApiResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ApiError::missing_field("jwt_secret"));
        }
        Ok(Self(SecretString::new(secret.into_boxed_str())))
    }

    fn insecure_default() -> Self {
        Self(SecretString::new(INSECURE_DEFAULT_SECRET.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.expose().len()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    pub fn is_insecure_default(&self) -> bool {
        self.expose() == INSECURE_DEFAULT_SECRET
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtSecret([REDACTED, {} chars])", self.len())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Clone)]
pub struct AuthConfig {
    pub api_keys: HashSet<String>,
    pub jwt_secret: JwtSecret,
    pub jwt_algorithm: Algorithm,
    /// Tolerated clock drift when checking `exp`.
    pub jwt_leeway_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_keys", &format!("[{} keys]", self.api_keys.len()))
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_keys: HashSet::new(),
            jwt_secret: JwtSecret::insecure_default(),
            jwt_algorithm: Algorithm::HS256,
            jwt_leeway_secs: 60,
        }
    }
}

impl AuthConfig {
    /// Load from `FILELINKS_API_KEYS` (comma-separated), `FILELINKS_JWT_SECRET`
    /// and `FILELINKS_JWT_LEEWAY_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_keys = std::env::var("FILELINKS_API_KEYS")
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let jwt_secret = std::env::var("FILELINKS_JWT_SECRET")
            .ok()
            .and_then(|s| JwtSecret::new(s).ok())
            .unwrap_or(defaults.jwt_secret);

        let jwt_leeway_secs = std::env::var("FILELINKS_JWT_LEEWAY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.jwt_leeway_secs);

        Self {
            api_keys,
            jwt_secret,
            jwt_leeway_secs,
            ..defaults
        }
    }

    /// Refuse the built-in secret and secrets too short to sign with.
    pub fn validate_for_production(&self) -> ApiResult<()> {
        if self.jwt_secret.is_insecure_default() {
            return Err(ApiError::invalid_input(
                "Cannot start in production with the default JWT secret. \
                 Set FILELINKS_JWT_SECRET.",
            ));
        }
        if self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ApiError::invalid_input(format!(
                "JWT secret has {} chars; production needs at least {}.",
                self.jwt_secret.len(),
                MIN_PRODUCTION_SECRET_LEN
            )));
        }
        Ok(())
    }

    pub fn add_api_key(&mut self, key: String) {
        self.api_keys.insert(key);
    }

    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.api_keys.contains(key)
    }
}

// ============================================================================
// CLAIMS AND CONTEXT
// ============================================================================

/// Bearer token claims. `sub` names the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ApiKey,
    Jwt,
}

/// The authenticated caller, stored in request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub auth_method: AuthMethod,
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

/// Principal for an API key: a SHA-256 digest of the whole key.
///
/// Keys are not tied to user accounts. Hashing keeps the key itself out of
/// every creator href while distinct keys stay distinct principals.
pub fn api_key_principal(api_key: &str) -> String {
    let digest = Sha256::digest(api_key.as_bytes());
    format!("api_key_{}", hex::encode(&digest[..16]))
}

pub fn authenticate_api_key(config: &AuthConfig, api_key: &str) -> ApiResult<AuthContext> {
    if !config.is_valid_api_key(api_key) {
        return Err(ApiError::unauthorized("Invalid API key"));
    }
    Ok(AuthContext {
        user_id: api_key_principal(api_key),
        auth_method: AuthMethod::ApiKey,
    })
}

/// Verify signature and expiry of a bearer token.
pub fn validate_jwt_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let key = DecodingKey::from_secret(config.jwt_secret.expose().as_bytes());

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.leeway = config.jwt_leeway_secs;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => ApiError::token_expired(),
            ErrorKind::InvalidSignature => ApiError::invalid_token("Token signature is invalid"),
            _ => ApiError::invalid_token(format!("Token validation failed: {}", e)),
        })
}

pub fn authenticate_jwt(config: &AuthConfig, token: &str) -> ApiResult<AuthContext> {
    let claims = validate_jwt_token(config, token)?;
    Ok(AuthContext {
        user_id: claims.sub,
        auth_method: AuthMethod::Jwt,
    })
}

/// Authenticate from the raw header values. `X-API-Key` wins over `Authorization`.
pub fn authenticate(
    config: &AuthConfig,
    api_key_header: Option<&str>,
    auth_header: Option<&str>,
) -> ApiResult<AuthContext> {
    match (api_key_header, auth_header) {
        (Some(api_key), _) => authenticate_api_key(config, api_key),
        (None, Some(value)) => match value.strip_prefix("Bearer ") {
            Some(token) => authenticate_jwt(config, token),
            None => Err(ApiError::invalid_token(
                "Authorization header must use Bearer scheme",
            )),
        },
        (None, None) => Err(ApiError::unauthorized(
            "Authentication required: provide X-API-Key or Authorization header",
        )),
    }
}

/// Token signing for tests across the crate.
#[cfg(test)]
pub(crate) mod test_tokens {
    use super::{AuthConfig, Claims};
    use jsonwebtoken::{encode, EncodingKey, Header};

    /// Token for `sub` expiring `ttl_secs` from now (negative: already expired).
    pub fn sign(
        config: &AuthConfig,
        sub: &str,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: sub.to_string(),
            exp: chrono::Utc::now().timestamp() + ttl_secs,
        };
        encode(
            &Header::new(config.jwt_algorithm),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.expose().as_bytes()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::sign;
    use super::*;
    use crate::error::ErrorCode;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn config() -> Result<AuthConfig, ApiError> {
        let mut config = AuthConfig {
            jwt_secret: JwtSecret::new("unit-test-secret")?,
            ..AuthConfig::default()
        };
        config.add_api_key("team-key-alice".to_string());
        config.add_api_key("team-key-bob".to_string());
        Ok(config)
    }

    #[test]
    fn test_api_keys_sharing_a_prefix_are_distinct_creators() -> ApiResult<()> {
        let config = config()?;

        let alice = authenticate(&config, Some("team-key-alice"), None)?;
        let bob = authenticate(&config, Some("team-key-bob"), None)?;

        assert_eq!(alice.auth_method, AuthMethod::ApiKey);
        assert_ne!(alice.user_id, bob.user_id);
        assert_eq!(alice.user_id, api_key_principal("team-key-alice"));
        Ok(())
    }

    #[test]
    fn test_api_key_principal_hides_the_key() {
        let principal = api_key_principal("team-key-alice");

        assert!(principal.starts_with("api_key_"));
        assert_eq!(principal.len(), "api_key_".len() + 32);
        assert!(!principal.contains("team-key"));
        assert_eq!(principal, api_key_principal("team-key-alice"));
    }

    #[test]
    fn test_unknown_api_key_rejected() -> ApiResult<()> {
        let result = authenticate(&config()?, Some("team-key-eve"), None);
        assert_eq!(result.map_err(|e| e.code), Err(ErrorCode::Unauthorized));
        Ok(())
    }

    #[test]
    fn test_authenticate_with_jwt() -> TestResult {
        let config = config()?;
        let header = format!("Bearer {}", sign(&config, "user123", 3600)?);

        let ctx = authenticate(&config, None, Some(&header))?;

        assert_eq!(ctx.auth_method, AuthMethod::Jwt);
        assert_eq!(ctx.user_id, "user123");
        Ok(())
    }

    #[test]
    fn test_expired_token() -> TestResult {
        let config = config()?;
        let token = sign(&config, "user123", -3600)?;

        let result = validate_jwt_token(&config, &token);
        assert_eq!(result.map_err(|e| e.code), Err(ErrorCode::TokenExpired));
        Ok(())
    }

    #[test]
    fn test_leeway_tolerates_small_drift() -> TestResult {
        let config = config()?;
        let token = sign(&config, "user123", -10)?;

        assert_eq!(validate_jwt_token(&config, &token)?.sub, "user123");
        Ok(())
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() -> TestResult {
        let config = config()?;
        let other = AuthConfig {
            jwt_secret: JwtSecret::new("some-other-secret")?,
            ..AuthConfig::default()
        };
        let token = sign(&other, "user123", 3600)?;

        let result = validate_jwt_token(&config, &token);
        assert_eq!(result.map_err(|e| e.code), Err(ErrorCode::InvalidToken));
        Ok(())
    }

    #[test]
    fn test_authenticate_rejects_non_bearer_scheme() -> ApiResult<()> {
        let result = authenticate(&config()?, None, Some("Basic dXNlcjpwYXNz"));
        assert_eq!(result.map_err(|e| e.code), Err(ErrorCode::InvalidToken));
        Ok(())
    }

    #[test]
    fn test_authenticate_no_credentials() -> ApiResult<()> {
        let result = authenticate(&config()?, None, None);
        assert_eq!(result.map_err(|e| e.code), Err(ErrorCode::Unauthorized));
        Ok(())
    }

    #[test]
    fn test_blank_secret_rejected() {
        assert!(JwtSecret::new("   ").is_err());
    }

    #[test]
    fn test_production_validation() -> ApiResult<()> {
        assert!(AuthConfig::default().validate_for_production().is_err());

        let short = AuthConfig {
            jwt_secret: JwtSecret::new("short")?,
            ..AuthConfig::default()
        };
        assert!(short.validate_for_production().is_err());

        let secure = AuthConfig {
            jwt_secret: JwtSecret::new("a-production-secret-of-forty-two-characters")?,
            ..AuthConfig::default()
        };
        assert!(secure.validate_for_production().is_ok());
        Ok(())
    }
}
