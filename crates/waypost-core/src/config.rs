use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaypostError};

/// Startup configuration for Waypost.
///
/// Loaded once from a TOML file with a `[general]` and an `[smtp]` section.
/// Every key in both sections is required; the snapshot is never mutated
/// after [`WaypostConfig::load`] returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypostConfig {
    pub general: GeneralConfig,
    pub smtp: SmtpConfig,
}

impl WaypostConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: WaypostConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty values for required keys.
    ///
    /// Presence is enforced by deserialization; an empty string is treated
    /// the same as an absent key.
    pub fn validate(&self) -> Result<()> {
        let g = &self.general;
        require("general", "database", &g.database)?;
        require("general", "secret", &g.secret)?;
        require("general", "authheader", &g.authheader)?;
        require_port("general", "sslport", g.sslport)?;
        require_port("general", "httpport", g.httpport)?;
        require("general", "sslcert", &g.sslcert)?;
        require("general", "sslkey", &g.sslkey)?;

        let s = &self.smtp;
        require("smtp", "server", &s.server)?;
        require_port("smtp", "port", s.port)?;
        require("smtp", "username", &s.username)?;
        require("smtp", "password", &s.password)?;
        require("smtp", "sendto", &s.sendto)?;
        Ok(())
    }
}

fn require(section: &str, key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WaypostError::Config(format!(
            "Missing key: '{}' under section: {}",
            key, section
        )));
    }
    Ok(())
}

fn require_port(section: &str, key: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(WaypostError::Config(format!(
            "Invalid port for key: '{}' under section: {}",
            key, section
        )));
    }
    Ok(())
}

/// `[general]` section: storage, credentials and listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// SQLite database path.
    pub database: String,
    /// Shared secret callers must present on gated routes.
    pub secret: String,
    /// Name of the request header carrying the secret.
    pub authheader: String,
    pub sslport: u16,
    pub httpport: u16,
    /// PEM certificate chain for the TLS listener.
    pub sslcert: String,
    /// PEM private key for the TLS listener.
    pub sslkey: String,
    /// Listener switches are TOML booleans; a quoted `"true"` is rejected.
    pub httpenabled: bool,
    pub sslenabled: bool,
    /// Interface both listeners bind to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[smtp]` section: outbound mail relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    /// Login name; also used as the sender address.
    pub username: String,
    pub password: String,
    /// Comma-separated recipient list.
    pub sendto: String,
}

impl SmtpConfig {
    /// Recipient addresses from `sendto`, trimmed, with empty segments dropped.
    pub fn recipients(&self) -> Vec<String> {
        self.sendto
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[general]
database = "/var/lib/waypost/waypost.db"
secret = "hunter2"
authheader = "X-Waypost-Auth"
sslport = 8443
httpport = 8080
sslcert = "/etc/waypost/cert.pem"
sslkey = "/etc/waypost/key.pem"
httpenabled = true
sslenabled = false

[smtp]
server = "smtp.example.com"
port = 587
username = "alerts@example.com"
password = "app-password"
sendto = "ops@example.com, me@example.com"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID);
        let config = WaypostConfig::load(file.path()).unwrap();
        assert_eq!(config.general.database, "/var/lib/waypost/waypost.db");
        assert_eq!(config.general.secret, "hunter2");
        assert_eq!(config.general.authheader, "X-Waypost-Auth");
        assert_eq!(config.general.sslport, 8443);
        assert_eq!(config.general.httpport, 8080);
        assert!(config.general.httpenabled);
        assert!(!config.general.sslenabled);
        assert_eq!(config.smtp.server, "smtp.example.com");
        assert_eq!(config.smtp.port, 587);
    }

    #[test]
    fn test_optional_keys_use_defaults() {
        let config = WaypostConfig::from_toml(VALID).unwrap();
        assert_eq!(config.general.bind_address, "0.0.0.0");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let content = VALID.replace("secret = \"hunter2\"\n", "");
        let err = WaypostConfig::from_toml(&content).unwrap_err();
        assert!(matches!(err, WaypostError::Config(_)));
        assert!(err.to_string().contains("secret"));
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let content = VALID.split("[smtp]").next().unwrap();
        let err = WaypostConfig::from_toml(content).unwrap_err();
        assert!(matches!(err, WaypostError::Config(_)));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let content = VALID.replace("authheader = \"X-Waypost-Auth\"", "authheader = \"\"");
        let err = WaypostConfig::from_toml(&content).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing key: 'authheader' under section: general"
        );
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let content = VALID.replace("port = 587", "port = 0");
        let err = WaypostConfig::from_toml(&content).unwrap_err();
        assert!(err.to_string().contains("'port' under section: smtp"));
    }

    #[test]
    fn test_listener_flags_must_be_booleans() {
        let content = VALID.replace("httpenabled = true", "httpenabled = \"true\"");
        let err = WaypostConfig::from_toml(&content).unwrap_err();
        assert!(matches!(err, WaypostError::Config(ref msg) if msg.contains("httpenabled")));
    }

    #[test]
    fn test_both_listeners_can_be_enabled() {
        let content = VALID.replace("sslenabled = false", "sslenabled = true");
        let config = WaypostConfig::from_toml(&content).unwrap();
        assert!(config.general.httpenabled && config.general.sslenabled);
    }

    #[test]
    fn test_load_missing_file() {
        let err = WaypostConfig::load(Path::new("/nonexistent/waypost.toml")).unwrap_err();
        assert!(matches!(err, WaypostError::Io(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        assert!(WaypostConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_recipients_are_trimmed() {
        let config = WaypostConfig::from_toml(VALID).unwrap();
        assert_eq!(
            config.smtp.recipients(),
            vec!["ops@example.com".to_string(), "me@example.com".to_string()]
        );
    }

    #[test]
    fn test_recipients_skip_empty_segments() {
        let smtp = SmtpConfig {
            server: "smtp.example.com".into(),
            port: 25,
            username: "a@example.com".into(),
            password: "pw".into(),
            sendto: "one@example.com,, two@example.com ,".into(),
        };
        assert_eq!(smtp.recipients().len(), 2);
    }
}
