use clap::{ArgGroup, Parser};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const ENDPOINT_ENV_VAR: &str = "AI_SERVICE_ENDPOINT";
pub const KEY_ENV_VAR: &str = "AI_SERVICE_KEY";
pub const SECRETS_FILE_ENV_VAR: &str = "TEXTSCOPE_SECRETS_FILE";
pub const RUN_ID_ENV_VAR: &str = "TEXTSCOPE_RUN_ID";

/// Entry names used when the secrets come from a managed store export
/// instead of the environment.
pub const SECRET_ENDPOINT_ENTRY: &str = "AIServicesEndpoint";
pub const SECRET_KEY_ENTRY: &str = "AIServicesKey";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No service endpoint configured. Set {ENDPOINT_ENV_VAR} or provide a secrets file.")]
    MissingEndpoint,
    #[error("No service key configured. Set {KEY_ENV_VAR} or provide a secrets file.")]
    MissingKey,
    #[error("Service endpoint '{endpoint}' is not a valid URL. {error:?}")]
    InvalidEndpoint {
        endpoint: String,
        error: url::ParseError,
    },
    #[error("Unable to read secrets file {file_name}. {error:?}")]
    UnreadableSecretsFile {
        file_name: String,
        error: std::io::Error,
    },
    #[error("Unable to parse secrets file {file_name}. {error:?}")]
    InvalidSecretsFile {
        file_name: String,
        error: serde_yaml::Error,
    },
}

#[derive(Parser, Debug)]
#[clap(group = ArgGroup::new("config"))]
pub struct ConfigOptions {
    /// Base URL of the text-analytics service.
    #[clap(long, env = ENDPOINT_ENV_VAR, global(true))]
    endpoint: Option<String>,

    /// Subscription key for the text-analytics service.
    #[clap(long, env = KEY_ENV_VAR, global(true), hide_env_values = true)]
    key: Option<String>,

    /// A YAML file with `AIServicesEndpoint` and `AIServicesKey` entries.
    /// Used as a fallback when the endpoint or key is not set directly.
    #[clap(long, env = SECRETS_FILE_ENV_VAR, global(true))]
    secrets_file: Option<String>,

    /// When outputting logs, the run-id is the unique value that will define where these go.
    /// In the case that the run-id is re-used, the old values will be overwritten.
    #[arg(long, global(true), env = RUN_ID_ENV_VAR)]
    run_id: Option<String>,
}

impl ConfigOptions {
    pub fn generate_run_id() -> String {
        let id = nanoid::nanoid!(4, &nanoid::alphabet::SAFE);
        let now = chrono::Local::now();
        let current_time = now.format("%Y%m%d");
        format!("{}-{}", current_time, id)
    }

    pub fn get_run_id(&self) -> String {
        self.run_id.clone().unwrap_or_else(Self::generate_run_id)
    }

    /// Resolve the service credentials, preferring flags/environment over the
    /// secrets file. Missing values are a hard error; there is no retry.
    pub fn load_config(&self) -> Result<ServiceConfig, ConfigError> {
        let secrets = self.load_secrets_file()?;
        let from_secrets =
            |entry: &str| secrets.as_ref().and_then(|s| s.get(entry)).cloned();

        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| from_secrets(SECRET_ENDPOINT_ENTRY))
            .ok_or(ConfigError::MissingEndpoint)?;
        let key = self
            .key
            .clone()
            .or_else(|| from_secrets(SECRET_KEY_ENTRY))
            .ok_or(ConfigError::MissingKey)?;

        let endpoint = Url::parse(&endpoint)
            .map_err(|error| ConfigError::InvalidEndpoint { endpoint, error })?;

        debug!("Loaded service config for {}", endpoint);

        Ok(ServiceConfig {
            endpoint,
            key: SecretString::from(key),
            run_id: self.get_run_id(),
        })
    }

    fn load_secrets_file(&self) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
        let Some(file_name) = &self.secrets_file else {
            return Ok(None);
        };

        let contents = std::fs::read_to_string(file_name).map_err(|error| {
            ConfigError::UnreadableSecretsFile {
                file_name: file_name.clone(),
                error,
            }
        })?;
        let entries = serde_yaml::from_str(&contents).map_err(|error| {
            ConfigError::InvalidSecretsFile {
                file_name: file_name.clone(),
                error,
            }
        })?;

        Ok(Some(entries))
    }
}

/// Read-only credentials for the text-analytics service, loaded once at
/// startup and passed to every component that talks to the service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint: Url,
    key: SecretString,
    pub run_id: String,
}

impl ServiceConfig {
    pub fn new(endpoint: Url, key: SecretString, run_id: String) -> Self {
        Self {
            endpoint,
            key,
            run_id,
        }
    }

    pub fn api_key(&self) -> &str {
        self.key.expose_secret()
    }

    /// Absolute URL for a service route, tolerating endpoints with or
    /// without a trailing slash.
    pub fn route(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.as_str().trim_end_matches('/'), path)
    }
}
