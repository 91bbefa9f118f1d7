use crate::usecases::expire_subscriptions::ExpireSubscriptionsUseCase;
use anyhow::Result;
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

pub async fn run(usecase: Arc<ExpireSubscriptionsUseCase>, interval: Duration) -> Result<()> {
    info!("Starting subscription expiry sweep, interval {:?}", interval);

    loop {
        if let Err(e) = usecase.run(Utc::now()).await {
            error!("Error while sweeping expired subscriptions: {}", e);
        }

        tokio::time::sleep(interval).await;
    }
}
