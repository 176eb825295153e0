use clap::Parser;
use serde::Serialize;
use user_preferences::app::{App, ConfiguredStore};
use user_preferences::config::cli::Command;
use user_preferences::utils::{logger, validation::Validate};
use user_preferences::{AppError, CliConfig, PreferenceService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置 (檔案 + 命令列覆蓋)
    let config = match cli.service_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    if config.json_logs() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Service config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let app = App::build(&config)?;
    let outcome = run(&app.service, &cli.command).await;

    // 等待事件送出後再離開
    app.shutdown().await;

    match outcome {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                "Operation failed: {} (status {}, id {})",
                e,
                e.status_code(),
                e.error_id()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(
    service: &PreferenceService<ConfiguredStore>,
    command: &Command,
) -> Result<(), AppError> {
    match command {
        Command::List { user } => print_json(&service.get_preferences_for_user(user).await?),
        Command::Category { user, category } => print_json(
            &service
                .get_preference_by_category_for_user(user, category)
                .await?,
        ),
        Command::Get {
            user,
            category,
            name,
        } => print_json(
            &service
                .get_preference_by_category_and_name_for_user(user, category, name)
                .await?,
        ),
        Command::Update { user, input } => {
            let preferences = input.load().await?;
            let count = preferences.len();
            service.update_preferences(user, preferences).await?;
            println!("✅ Saved {} preferences for {}", count, user);
            Ok(())
        }
        Command::Delete { user, input } => {
            let preferences = input.load().await?;
            let count = preferences.len();
            service.delete_preferences(user, preferences).await?;
            println!("✅ Deleted {} preferences for {}", count, user);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
