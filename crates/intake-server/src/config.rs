use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "build";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 15_000;

/// Everything the binary reads from the environment, resolved once at boot.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Prefix the dashboard is mounted under, e.g. "/intake". Empty for root.
    pub base_path: String,
    /// Directory holding the built dashboard assets and its entry document.
    pub static_dir: PathBuf,
    pub backend_url: Option<String>,
    pub backend_email: Option<String>,
    pub backend_password: Option<String>,
    /// Zero disables the periodic view refresh.
    pub refresh_interval_ms: u64,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_path: String::new(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            backend_url: None,
            backend_email: None,
            backend_password: None,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            log_json: false,
        }
    }
}

pub fn validate_startup_config_contract(config: &ServerConfig) -> Result<(), String> {
    if config.port == 0 {
        return Err("PORT must be > 0".to_string());
    }
    if !config.base_path.is_empty() {
        if !config.base_path.starts_with('/') {
            return Err("base path must start with '/'".to_string());
        }
        if config.base_path.ends_with('/') {
            return Err("base path must not end with '/'".to_string());
        }
    }
    if config.backend_email.is_some() != config.backend_password.is_some() {
        return Err("backend credentials require both an email and a password".to_string());
    }
    if config.backend_email.is_some() && config.backend_url.is_none() {
        return Err("backend credentials are set but no backend url is".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_config_validation_rejects_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        let err = validate_startup_config_contract(&config).expect_err("port zero");
        assert!(err.contains("PORT"));
    }

    #[test]
    fn startup_config_validation_pins_base_path_shape() {
        let mut config = ServerConfig {
            base_path: "dash".to_string(),
            ..ServerConfig::default()
        };
        let err = validate_startup_config_contract(&config).expect_err("missing leading slash");
        assert!(err.contains("start with"));

        config.base_path = "/dash/".to_string();
        let err = validate_startup_config_contract(&config).expect_err("trailing slash");
        assert!(err.contains("end with"));

        config.base_path = "/dash".to_string();
        validate_startup_config_contract(&config).expect("valid base path");
    }

    #[test]
    fn startup_config_validation_enforces_credential_pairing() {
        let mut config = ServerConfig {
            backend_url: Some("http://backend.local".to_string()),
            backend_email: Some("ops@example.com".to_string()),
            ..ServerConfig::default()
        };
        let err = validate_startup_config_contract(&config).expect_err("missing password");
        assert!(err.contains("password"));

        config.backend_password = Some("hunter2".to_string());
        validate_startup_config_contract(&config).expect("paired credentials");

        config.backend_url = None;
        let err = validate_startup_config_contract(&config).expect_err("credentials without url");
        assert!(err.contains("backend url"));
    }
}
