//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ClientConfig, CorsConfig, LogFormat, LoggingConfig, ServerConfig, StorageSettings,
};
