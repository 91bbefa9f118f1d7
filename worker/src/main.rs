use anyhow::Result;
use crates::domain::repositories::subscription_expiry::SubscriptionExpiryRepository;
use crates::infra::db::{
    postgres::postgres_connection,
    repositories::subscription_expiry::SubscriptionExpiryPostgres,
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};
use worker::{config, services::sweep_loop, usecases::expire_subscriptions::ExpireSubscriptionsUseCase};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let expiry_repository: Arc<dyn SubscriptionExpiryRepository + Send + Sync> =
        Arc::new(SubscriptionExpiryPostgres::new(Arc::clone(&db_pool_arc)));

    let expire_usecase = Arc::new(ExpireSubscriptionsUseCase::new(expiry_repository));

    let sweep = tokio::spawn(sweep_loop::run(
        expire_usecase,
        Duration::from_secs(dotenvy_env.sweep.interval_secs),
    ));

    tokio::select! {
        result = sweep => result??,
    };
    Ok(())
}
