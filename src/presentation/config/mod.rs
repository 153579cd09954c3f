mod environment;
mod scaffold_config;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use scaffold_config::ScaffoldConfig;
pub use settings::{
    AuthSettings, DatabaseSettings, LoggingSettings, ServerSettings, Settings,
    StorageProviderSetting, StorageSettings, TranscoderSettings, ViewSettings,
};
