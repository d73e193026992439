use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.app.level))
        .init();

    let server = settings.server;
    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    match engine.repair_pending().await {
        Ok(0) => {}
        Ok(repaired) => tracing::info!(repaired, "repaired pending reconciliations"),
        Err(err) => tracing::error!("failed to repair pending reconciliations: {err}"),
    }

    let auth = server::AuthConfig {
        jwt_secret: server.jwt_secret,
        token_ttl_hours: server
            .token_ttl_hours
            .unwrap_or(server::DEFAULT_TOKEN_TTL_HOURS),
    };
    let state = server::ServerState::new(engine, &auth);

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    server::run_with_listener(state, listener).await?;
    Ok(())
}

fn env_filter(level: &str) -> String {
    format!("kaskrout={level},server={level},engine={level},tower_http={level}")
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
