/// Command-line and environment configuration
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_EXPORT_ENDPOINT: &str = "http://localhost:3000/upload";
pub const DEFAULT_LOG_FILE: &str = "plater.log";
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 10;

pub const ENV_EXPORT_URL: &str = "PLATER_EXPORT_URL";
pub const ENV_LOG_FILE: &str = "PLATER_LOG_FILE";
pub const ENV_EXPORT_TIMEOUT: &str = "PLATER_EXPORT_TIMEOUT";

pub const USAGE: &str = "\
Usage: plater-terminal [OPTIONS] [STL-FILE]

Options:
  --endpoint <URL>        export endpoint [env: PLATER_EXPORT_URL]
  --log-file <PATH>       log file [env: PLATER_LOG_FILE]
  --timeout-secs <SECS>   export request timeout [env: PLATER_EXPORT_TIMEOUT]
  -h, --help              print this help";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("help requested")]
    HelpRequested,

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' needs a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// STL file to load at startup; a demo cube is used without one
    pub stl_path: Option<PathBuf>,
    pub endpoint: String,
    pub log_file: PathBuf,
    pub export_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stl_path: None,
            endpoint: DEFAULT_EXPORT_ENDPOINT.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            export_timeout: Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Read the process arguments and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Environment values are applied first; command-line options override them.
    pub fn parse<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = env(ENV_EXPORT_URL) {
            config.endpoint = endpoint;
        }
        if let Some(path) = env(ENV_LOG_FILE) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(secs) = env(ENV_EXPORT_TIMEOUT) {
            config.export_timeout = parse_timeout(ENV_EXPORT_TIMEOUT, &secs)?;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "--endpoint" => config.endpoint = value_for(&arg, args.next())?,
                "--log-file" => config.log_file = PathBuf::from(value_for(&arg, args.next())?),
                "--timeout-secs" => {
                    let secs = value_for(&arg, args.next())?;
                    config.export_timeout = parse_timeout(&arg, &secs)?;
                }
                option if option.starts_with('-') => {
                    return Err(ConfigError::UnknownOption(option.to_string()));
                }
                path if config.stl_path.is_none() => config.stl_path = Some(PathBuf::from(path)),
                other => return Err(ConfigError::UnexpectedArgument(other.to_string())),
            }
        }

        Ok(config)
    }
}

fn value_for(name: &str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingValue(name.to_string()))
}

fn parse_timeout(name: &str, value: &str) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
