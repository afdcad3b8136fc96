use crate::errors::ConfigurationError;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::env::var;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub directory: DirectorySettings,
    pub storage: StorageSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub host: String,
    pub port: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DirectorySettings {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub keyword: String,
    pub timeout_secs: u64,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StorageSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub storage_type: StorageType,
    pub file_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum StorageType {
    InMemory,
    File,
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::InMemory => write!(f, "in_memory"),
            StorageType::File => write!(f, "file"),
        }
    }
}

impl FromStr for StorageType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_memory" => Ok(StorageType::InMemory),
            "file" => Ok(StorageType::File),
            &_ => Err(ConfigurationError::UnknownStorageType),
        }
    }
}

impl StorageSettings {
    pub fn check_if_valid(&self) -> Result<(), ConfigurationError> {
        match self.storage_type {
            StorageType::InMemory => Ok(()),
            StorageType::File => match &self.file_path {
                None => Err(ConfigurationError::MissingStorageSettings),
                Some(_) => Ok(()),
            },
        }
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Eq, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `dev` or `prod`."
            )),
        }
    }
}

pub fn get_env() -> Environment {
    let environment: Environment = var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "dev".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    environment
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let environment = get_env();
    let second_source = format!("configuration/{}", environment.as_str());
    let settings = Config::builder()
        .add_source(config::File::new("configuration/base", FileFormat::Yaml))
        .add_source(config::File::new(&second_source, FileFormat::Yaml))
        .build()?;
    settings.try_deserialize::<Settings>()
}
