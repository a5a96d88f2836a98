//! Application state shared across all route handlers.
//!
//! Everything here is built once at startup and is read-only afterwards;
//! the only shared mutable resource is the database behind `tags`.

use std::sync::Arc;

use waypost_core::config::WaypostConfig;
use waypost_core::error::WaypostError;
use waypost_notify::NotificationRelay;
use waypost_storage::{Database, TagRepository};

use crate::auth::AuthGate;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Tag-to-URL store.
    pub tags: TagRepository,
    /// Outbound relay for `/notify`.
    pub relay: Arc<dyn NotificationRelay>,
    /// Shared-secret gate for mutating routes.
    pub auth: AuthGate,
}

impl AppState {
    /// Create a new AppState with the given components.
    ///
    /// Only the auth settings are read from `config`. Fails if the
    /// configured auth header is not a valid header name.
    pub fn new(
        config: &WaypostConfig,
        database: Database,
        relay: Arc<dyn NotificationRelay>,
    ) -> Result<Self, WaypostError> {
        let auth = AuthGate::new(&config.general.authheader, &config.general.secret)?;
        Ok(Self {
            tags: TagRepository::new(Arc::new(database)),
            relay,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use waypost_notify::{Notification, RelayError};

    struct NoopRelay;

    #[async_trait]
    impl NotificationRelay for NoopRelay {
        async fn relay(&self, _: &Notification) -> Result<(), RelayError> {
            Ok(())
        }
    }

    fn config(authheader: &str) -> WaypostConfig {
        WaypostConfig::from_toml(&format!(
            r#"
[general]
database = ":memory:"
secret = "s3cret"
authheader = "{authheader}"
sslport = 8443
httpport = 8080
sslcert = "cert.pem"
sslkey = "key.pem"
httpenabled = true
sslenabled = false

[smtp]
server = "smtp.example.com"
port = 587
username = "alerts@example.com"
password = "pw"
sendto = "ops@example.com"
"#
        ))
        .unwrap()
    }

    #[test]
    fn test_auth_gate_built_from_config() {
        let state = AppState::new(
            &config("X-Custom-Auth"),
            Database::in_memory().unwrap(),
            Arc::new(NoopRelay),
        )
        .unwrap();
        assert_eq!(state.auth.header_name().as_str(), "x-custom-auth");
        assert!(state.auth.authorize(Some("s3cret")).is_ok());
    }

    #[test]
    fn test_invalid_auth_header_is_rejected() {
        let result = AppState::new(
            &config("bad header"),
            Database::in_memory().unwrap(),
            Arc::new(NoopRelay),
        );
        assert!(matches!(result, Err(WaypostError::Config(_))));
    }
}
