use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_ADDRESS: &str = "192.168.8.1";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ModemConfig {
    pub address: String,
    pub username: String,
    pub password: Secret<String>,
    pub timeout_seconds: u64,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: Secret::new("admin".to_string()),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

// Custom Serialize implementation - never expose the password in serialization
impl Serialize for ModemConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ModemConfig", 4)?;
        state.serialize_field("address", &self.address)?;
        state.serialize_field("username", &self.username)?;
        state.serialize_field("password", "[REDACTED]")?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ModemConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ModemConfigHelper {
            #[serde(default = "default_address")]
            address: String,
            #[serde(default = "default_username")]
            username: String,
            password: String,
            #[serde(default = "default_timeout")]
            timeout_seconds: u64,
        }

        let helper = ModemConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            address: helper.address,
            username: helper.username,
            password: Secret::new(helper.password),
            timeout_seconds: helper.timeout_seconds,
        })
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl ModemConfig {
    /// Create a configuration for the default address with the given credentials
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password: Secret::new(password),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_PASSWORD`
    /// - `{PREFIX}_ADDRESS` (optional, defaults to `192.168.8.1`)
    /// - `{PREFIX}_USERNAME` (optional, defaults to `admin`)
    /// - `{PREFIX}_TIMEOUT_SECONDS` (optional, defaults to 10)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let password_var = format!("{}_PASSWORD", prefix);
        let timeout_var = format!("{}_TIMEOUT_SECONDS", prefix);

        let password = env::var(&password_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(password_var))?;

        let address =
            env::var(format!("{}_ADDRESS", prefix)).unwrap_or_else(|_| default_address());
        let username =
            env::var(format!("{}_USERNAME", prefix)).unwrap_or_else(|_| default_username());

        let timeout_seconds = match env::var(&timeout_var) {
            Ok(value) => value.parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!(
                    "{} must be a number of seconds: {}",
                    timeout_var, e
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            address,
            username,
            password: Secret::new(password),
            timeout_seconds,
        })
    }

    /// Create configuration from a `.env` file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no .env file, fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Set the device address
    #[must_use]
    pub fn address(mut self, address: String) -> Self {
        self.address = address;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Get the password (use carefully - exposes secret)
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModemConfig::new("admin".to_string(), "admin1".to_string());
        assert_eq!(config.address, "192.168.8.1");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.password(), "admin1");
    }

    #[test]
    fn test_serialize_redacts_password() {
        let config = ModemConfig::new("admin".to_string(), "hunter2".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ModemConfig = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.username, DEFAULT_USERNAME);
        assert_eq!(config.password(), "pw");
    }

    #[test]
    fn test_from_env() {
        env::set_var("HUAMODEM_CFGTEST_PASSWORD", "secret");
        env::set_var("HUAMODEM_CFGTEST_ADDRESS", "192.168.1.1");
        env::set_var("HUAMODEM_CFGTEST_TIMEOUT_SECONDS", "3");

        let config = ModemConfig::from_env("huamodem_cfgtest").unwrap();
        assert_eq!(config.address, "192.168.1.1");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password(), "secret");
        assert_eq!(config.timeout_seconds, 3);
    }

    #[test]
    fn test_from_env_missing_password() {
        let err = ModemConfig::from_env("HUAMODEM_MISSING").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvironmentVariable(var) if var == "HUAMODEM_MISSING_PASSWORD"
        ));
    }

    #[test]
    fn test_from_env_bad_timeout() {
        env::set_var("HUAMODEM_BADTIMEOUT_PASSWORD", "secret");
        env::set_var("HUAMODEM_BADTIMEOUT_TIMEOUT_SECONDS", "soon");

        assert!(matches!(
            ModemConfig::from_env("HUAMODEM_BADTIMEOUT"),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }
}
