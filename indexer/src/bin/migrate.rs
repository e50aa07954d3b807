use inscriptions_indexer::config::AppConfig;
use inscriptions_indexer::utils::logging;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::env;

/// Usage: `migrate [up|down|fresh|status]`, defaults to `up`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let config = AppConfig::from_env();
    logging::log_database_connection_details(&config.database.url);

    let connection = Database::connect(&config.database.url).await?;
    let command = env::args().nth(1).unwrap_or_else(|| "up".to_string());

    match command.as_str() {
        "up" => {
            logging::log_info("Running database migrations...");
            Migrator::up(&connection, None).await?;
        }
        "down" => {
            logging::log_info("Rolling back the last migration...");
            Migrator::down(&connection, Some(1)).await?;
        }
        "fresh" => {
            logging::log_info("Dropping all tables and re-running migrations...");
            Migrator::fresh(&connection).await?;
        }
        "status" => {
            Migrator::status(&connection).await?;
        }
        other => anyhow::bail!("unknown command '{}', expected up, down, fresh or status", other),
    }

    logging::log_info("Migrations completed successfully!");
    Ok(())
}
