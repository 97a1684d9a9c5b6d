mod config_load;
mod logging;

pub mod prelude {
    pub use super::config_load::{
        ConfigError, ConfigOptions, ENDPOINT_ENV_VAR, KEY_ENV_VAR, RUN_ID_ENV_VAR,
        SECRET_ENDPOINT_ENTRY, SECRET_KEY_ENTRY, SECRETS_FILE_ENV_VAR, ServiceConfig,
    };
    pub use super::logging::{LoggingOpts, LoggingProgress, STDOUT_WRITER};
}
