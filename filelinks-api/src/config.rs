//! API Configuration Module
//!
//! CORS settings and the set of external storages file links may point at.
//! Configuration is loaded from environment variables with sensible defaults
//! for development.

use filelinks_core::EntityId;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and registered storages.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    /// Example: "https://pm.example.org,https://app.pm.example.org"
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Storage Configuration
    // ========================================================================
    /// Storages that file links may reference. A link to any other storage is
    /// rejected with "does not exist".
    pub storage_ids: Vec<EntityId>,

    /// Serve Prometheus metrics at /metrics.
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            storage_ids: Vec::new(),
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `FILELINKS_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `FILELINKS_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `FILELINKS_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `FILELINKS_STORAGE_IDS`: Comma-separated storage UUIDs
    /// - `FILELINKS_METRICS_ENABLED`: "false" or "0" hides /metrics (default: enabled)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("FILELINKS_CORS_ORIGINS")
            .ok()
            .map(|s| split_list(&s).map(str::to_string).collect())
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("FILELINKS_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = std::env::var("FILELINKS_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let storage_ids = std::env::var("FILELINKS_STORAGE_IDS")
            .map(|s| parse_storage_ids(&s))
            .unwrap_or_default();

        let metrics_enabled = std::env::var("FILELINKS_METRICS_ENABLED")
            .map(|s| !matches!(s.to_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            storage_ids,
            metrics_enabled,
        }
    }

    /// Register an additional storage.
    pub fn with_storage(mut self, storage_id: EntityId) -> Self {
        self.storage_ids.push(storage_id);
        self
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // *.example.org
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|v| !v.is_empty())
}

/// Unparseable entries are logged and skipped.
fn parse_storage_ids(value: &str) -> Vec<EntityId> {
    split_list(value)
        .filter_map(|raw| match EntityId::parse_str(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(value = raw, error = %e, "Ignoring invalid storage id");
                None
            }
        })
        .collect()
}
