use crate::core::Preferences;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every preference of a user
    List {
        #[arg(long)]
        user: String,
    },
    /// List the preferences of a user in one category
    Category {
        #[arg(long)]
        user: String,
        #[arg(long)]
        category: String,
    },
    /// Show a single preference
    Get {
        #[arg(long)]
        user: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        name: String,
    },
    /// Save preferences on behalf of a user
    Update {
        #[arg(long)]
        user: String,
        #[command(flatten)]
        input: PreferencesInput,
    },
    /// Delete preferences on behalf of a user
    Delete {
        #[arg(long)]
        user: String,
        #[command(flatten)]
        input: PreferencesInput,
    },
}

/// JSON array of preferences, given inline or as a file.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct PreferencesInput {
    #[arg(long)]
    pub file: Option<String>,

    #[arg(long)]
    pub json: Option<String>,
}

impl PreferencesInput {
    pub async fn load(&self) -> Result<Preferences> {
        let raw = match &self.json {
            Some(inline) => inline.clone(),
            None => {
                let path = validate_required_field("--file or --json", &self.file)?;
                tokio::fs::read_to_string(path).await?
            }
        };
        Ok(Preferences::from_json(&raw)?)
    }
}
