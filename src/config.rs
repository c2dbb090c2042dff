use std::{fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::auth::AuthGate;
use crate::error::GatewayError;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub context: String,
    pub doc_root: String,
    pub index: String,
    pub realm: String,
    pub login: Option<String>,
    pub password: Option<String>,
    pub passwd_file: Option<String>,
    pub pin_count: usize,
    pub board_revision: u8,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            context: "webgpio".to_string(),
            doc_root: "/usr/share/webgpio/htdocs".to_string(),
            index: "index.html".to_string(),
            realm: "webgpio".to_string(),
            login: Some("webgpio".to_string()),
            password: Some("raspberry".to_string()),
            passwd_file: Some("/etc/webgpio/passwd".to_string()),
            pin_count: 54,
            board_revision: 2,
        }
    }
}

impl GatewayConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GatewayError> {
        let contents = fs::read_to_string(&path)
            .map_err(|e| GatewayError::Config(format!("Failed to read config: {e}")))?;
        serde_json::from_str(&contents)
            .map_err(|e| GatewayError::Config(format!("Invalid config json: {e}")))
    }

    pub fn normalized_context(&self) -> String {
        let mut context = self.context.clone();
        if !context.starts_with('/') {
            context.insert(0, '/');
        }
        if !context.ends_with('/') {
            context.push('/');
        }
        context
    }

    // A stored digest file wins over the login/password pair; explicit null
    // credentials leave the gateway open.
    pub fn auth_gate(&self) -> Result<AuthGate, GatewayError> {
        if let Some(passwd_file) = &self.passwd_file {
            if Path::new(passwd_file).exists() {
                info!("Using stored credential digest from {passwd_file}");
                let digest = fs::read_to_string(passwd_file).map_err(|e| {
                    GatewayError::Config(format!("Failed to read {passwd_file}: {e}"))
                })?;
                return Ok(AuthGate::from_digest(&self.realm, &digest));
            }
        }

        if let (Some(login), Some(password)) = (&self.login, &self.password) {
            info!("Using configured login/password");
            return Ok(AuthGate::from_credentials(&self.realm, login, password));
        }

        Ok(AuthGate::open(&self.realm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn context_is_normalized_with_slashes() {
        let mut config = GatewayConfig::default();
        assert_eq!(config.normalized_context(), "/webgpio/");

        config.context = "/gpio".to_string();
        assert_eq!(config.normalized_context(), "/gpio/");

        config.context = "api/".to_string();
        assert_eq!(config.normalized_context(), "/api/");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: GatewayConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.context, "webgpio");
        assert_eq!(config.login.as_deref(), Some("webgpio"));
        assert_eq!(config.pin_count, 54);
    }

    #[test]
    fn digest_file_wins_over_credentials() {
        let mut passwd = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            passwd,
            "cbd3e42053102d75d628072b749cfd642a14028fc671f54a5f9a3d561bd9b5e4"
        )
        .unwrap();

        let config = GatewayConfig {
            passwd_file: Some(passwd.path().to_string_lossy().into_owned()),
            ..GatewayConfig::default()
        };
        let gate = config.auth_gate().unwrap();
        assert!(gate.authorize(Some("Basic YWRtaW46cEBzc3cwcmQ=")));
        assert!(!gate.authorize(Some("Basic d2ViZ3BpbzpyYXNwYmVycnk=")));
    }

    #[test]
    fn null_credentials_leave_the_gate_open() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"login": null, "password": null, "passwd_file": null}"#,
        )
        .unwrap();
        let gate = config.auth_gate().unwrap();
        assert!(gate.authorize(None));
    }

    #[test]
    fn absent_digest_file_falls_back_to_credentials() {
        let config = GatewayConfig {
            passwd_file: Some("/nonexistent/webgpio/passwd".to_string()),
            ..GatewayConfig::default()
        };
        let gate = config.auth_gate().unwrap();
        assert!(gate.authorize(Some("Basic d2ViZ3BpbzpyYXNwYmVycnk=")));
        assert!(!gate.authorize(None));
    }
}
