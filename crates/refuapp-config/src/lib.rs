//! Shared configuration for RefuApp tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! translation to `refuapp_core::ClientConfig`, and the file-backed
//! session store the CLI keeps its token in.

mod session;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use refuapp_core::{ClientConfig, TlsVerification};

pub use session::FileStore;

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "refuapp";

/// Environment variable consulted for the password when a profile
/// names none.
pub const PASSWORD_ENV: &str = "REFUAPP_PASSWORD";

/// Environment variable consulted for the username.
pub const USERNAME_ENV: &str = "REFUAPP_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Refuge feed poll interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    refuapp_core::DEFAULT_TIMEOUT.as_secs()
}
fn default_poll_interval() -> u64 {
    refuapp_core::DEFAULT_POLL_INTERVAL.as_secs()
}
fn default_max_retries() -> u32 {
    refuapp_core::DEFAULT_MAX_RETRIES
}

/// A named API profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://api.refuapp.online").
    pub api_url: String,

    /// Administrator username.
    pub username: Option<String>,

    /// Password in plaintext. Keyring or env var preferred.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override feed poll interval (seconds).
    pub poll_interval_secs: Option<u64>,

    /// Override retry count.
    pub max_retries: Option<u32>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("online", "refuapp", "refuapp")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where session tokens are kept.
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.toml"),
        |dirs| dirs.data_dir().join("session.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("refuapp");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Defaults, then the file, then
/// `REFUAPP_`-prefixed variables (`__` separates nesting levels, e.g.
/// `REFUAPP_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("REFUAPP_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Username from the profile, else `REFUAPP_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain (no CLI flag step).
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env (or the default variable) → env lookup
    let env_name = profile.password_env.as_deref().unwrap_or(PASSWORD_ENV);
    if let Ok(val) = std::env::var(env_name) {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ClientConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval = Duration::from_secs(
        profile
            .poll_interval_secs
            .unwrap_or(defaults.poll_interval_secs)
            .max(1),
    );
    config.max_retries = profile.max_retries.unwrap_or(defaults.max_retries);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "mountain"

[defaults]
output = "json"
timeout = 10

[profiles.mountain]
api_url = "https://api.refuapp.online"
username = "warden"
password_env = "REFUAPP_TEST_MOUNTAIN_PASSWORD"
poll_interval_secs = 5
"#;

    #[test]
    fn loads_profiles_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("mountain"));
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.max_retries, 3);

        let profile = &config.profiles["mountain"];
        let client = profile_to_client_config(profile, &config.defaults).unwrap();
        assert_eq!(client.api_url.as_str(), "https://api.refuapp.online/");
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.poll_interval, Duration::from_secs(5));
        assert_eq!(client.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.defaults, Defaults::default());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                api_url: "http://localhost:8000".into(),
                insecure: Some(true),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let client =
            profile_to_client_config(&loaded.profiles["default"], &loaded.defaults).unwrap();
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn plaintext_password_is_the_last_resort() {
        let profile = Profile {
            api_url: "http://localhost".into(),
            password: Some("from-file".into()),
            password_env: Some("REFUAPP_TEST_UNSET_PASSWORD_VAR".into()),
            ..Profile::default()
        };
        // A keyring entry for this throwaway profile never exists.
        let password = resolve_password(&profile, "refuapp-test-no-keyring-entry").unwrap();
        assert_eq!(password.expose_secret(), "from-file");
    }

    #[test]
    fn username_is_required() {
        let profile = Profile::default();
        if std::env::var(USERNAME_ENV).is_err() {
            assert!(matches!(
                resolve_username(&profile, "default"),
                Err(ConfigError::NoCredentials { .. })
            ));
        }
    }
}
