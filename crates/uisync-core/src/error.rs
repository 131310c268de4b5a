// ── Core error types ──
//
// Errors surfaced by a sync cycle. These are NOT API-specific -- callers
// never see reqwest errors or JSON parse failures directly. The
// `From<uisync_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants.
//
// Per-item mutation failures never become a `CoreError`; they are logged
// and counted in `BatchSummary`. Only whole-collection fetches propagate.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the next scheduled cycle has a reasonable chance of succeeding
    /// without operator intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => status.is_none_or(|s| s >= 500),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<uisync_api::Error> for CoreError {
    fn from(err: uisync_api::Error) -> Self {
        let status = err.status();
        match err {
            uisync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            uisync_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status,
                    }
                }
            }
            uisync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            uisync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            uisync_api::Error::Api { message, .. } => CoreError::Api { message, status },
            uisync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_carries_over_and_drives_transience() {
        let server_side = CoreError::from(uisync_api::Error::Api {
            status: 503,
            message: "busy".into(),
        });
        assert!(matches!(server_side, CoreError::Api { status: Some(503), .. }));
        assert!(server_side.is_transient());

        let rejected = CoreError::from(uisync_api::Error::Api {
            status: 400,
            message: "bad entry".into(),
        });
        assert!(matches!(rejected, CoreError::Api { status: Some(400), .. }));
        assert!(!rejected.is_transient());
    }

    #[test]
    fn rejected_credentials_are_not_transient() {
        let err = CoreError::from(uisync_api::Error::Authentication {
            message: "bad token".into(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert!(!err.is_transient());
    }
}
