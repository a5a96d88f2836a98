//! Error types for the notification relay.

use waypost_core::error::WaypostError;

/// Errors from notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Invalid address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("Failed to build message: {0}")]
    Message(String),
    #[error("Mail transport failed: {0}")]
    Transport(String),
}

impl From<RelayError> for WaypostError {
    fn from(err: RelayError) -> Self {
        WaypostError::Relay(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_display() {
        let err = RelayError::Address {
            address: "not-an-address".to_string(),
            reason: "missing @".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid address 'not-an-address': missing @"
        );

        let err = RelayError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Mail transport failed: connection refused");
    }

    #[test]
    fn test_relay_error_into_waypost_error() {
        let err: WaypostError = RelayError::Message("no recipients".to_string()).into();
        assert!(matches!(err, WaypostError::Relay(_)));
        assert!(err.to_string().contains("no recipients"));
    }
}
