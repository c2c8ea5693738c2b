use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},telegram_bot={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    match settings.telegram {
        Some(telegram) => {
            tasks.spawn(async move {
                tracing::info!("Found telegram settings...");
                match telegram_bot::Bot::builder()
                    .token(&telegram.token)
                    .allowed_users(telegram.allowed_users)
                    .engine(engine)
                    .build()
                {
                    Ok(bot) => bot.run().await,
                    Err(err) => tracing::error!("failed to initialize telegram bot: {err}"),
                }
            });
        }
        None => tracing::warn!("no telegram settings, nothing to run"),
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };

    tracing::info!("opening database {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
