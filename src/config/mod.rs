#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "prefs")]
#[command(about = "Read and modify user preferences")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory of the file storage backend (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Push gateway that receives every event (overrides the config file)
    #[arg(long, global = true)]
    pub webhook_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: cli::Command,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file configuration (or defaults) and applies flag overrides.
    pub fn service_config(&self) -> crate::utils::error::Result<toml_config::ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => toml_config::ServiceConfig::from_file(path)?,
            None => toml_config::ServiceConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(url) = &self.webhook_url {
            config.events.webhook_url = Some(url.clone());
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }

        Ok(config)
    }
}
