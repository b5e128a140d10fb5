use mimalloc::MiMalloc;
use playerdb::{
    AuthRepository, AuthStore, ModStorageRepository, ModStore, config::Config, db,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        backend = %cfg.database.backend,
        database_url = %cfg.database.url,
        wal = cfg.database.wal,
        loglevel = %cfg.basic.loglevel
    );

    let db_type = cfg.database.backend;
    let pool = db::connect(&cfg.database).await?;

    let report = if cfg.database.wal {
        db::setup(&pool, db_type).await?
    } else {
        db::migrate(&pool, db_type).await?
    };
    info!(applied = report.applied.len(), "schema is current");

    let accounts = AuthRepository::new(pool.clone(), db_type).count().await?;
    let mod_entries = ModStorageRepository::new(pool.clone(), db_type)
        .count()
        .await?;
    info!(accounts, mod_entries, "database ready");

    pool.close().await;
    Ok(())
}
