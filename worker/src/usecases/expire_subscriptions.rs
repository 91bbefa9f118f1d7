use anyhow::Result;
use chrono::{DateTime, Utc};
use crates::domain::repositories::subscription_expiry::SubscriptionExpiryRepository;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ExpireSubscriptionsResult {
    pub expired: usize,
    pub expired_ids: Vec<Uuid>,
}

pub struct ExpireSubscriptionsUseCase {
    repository: Arc<dyn SubscriptionExpiryRepository + Send + Sync>,
}

impl ExpireSubscriptionsUseCase {
    pub fn new(repository: Arc<dyn SubscriptionExpiryRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// One sweep pass. The repository flips every active subscription whose
    /// end date is behind `now`, in a single statement, so a rerun over the
    /// same data is a no-op.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ExpireSubscriptionsResult> {
        let ids = self.repository.expire_overdue(now).await?;

        let mut result = ExpireSubscriptionsResult {
            expired: ids.len(),
            ..Default::default()
        };
        result.expired_ids = ids.into_iter().take(20).collect();

        info!(
            expired = result.expired,
            expired_ids = ?result.expired_ids,
            "expire_subscriptions: sweep completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    struct FakeSubscription {
        id: Uuid,
        active: bool,
        ends_at: DateTime<Utc>,
    }

    struct InMemoryExpiryRepository {
        subscriptions: Mutex<Vec<FakeSubscription>>,
    }

    #[async_trait]
    impl SubscriptionExpiryRepository for InMemoryExpiryRepository {
        async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
            let mut subscriptions = self.subscriptions.lock().unwrap();
            let mut expired = Vec::new();
            for subscription in subscriptions.iter_mut() {
                if subscription.active && subscription.ends_at < now {
                    subscription.active = false;
                    expired.push(subscription.id);
                }
            }
            Ok(expired)
        }
    }

    #[tokio::test]
    async fn sweep_expires_overdue_and_is_idempotent() {
        let now = Utc::now();
        let overdue_a = Uuid::new_v4();
        let overdue_b = Uuid::new_v4();
        let current = Uuid::new_v4();

        let repository = Arc::new(InMemoryExpiryRepository {
            subscriptions: Mutex::new(vec![
                FakeSubscription {
                    id: overdue_a,
                    active: true,
                    ends_at: now - Duration::days(1),
                },
                FakeSubscription {
                    id: overdue_b,
                    active: true,
                    ends_at: now - Duration::hours(1),
                },
                FakeSubscription {
                    id: current,
                    active: true,
                    ends_at: now + Duration::days(10),
                },
            ]),
        });

        let usecase = ExpireSubscriptionsUseCase::new(repository.clone());

        let first = usecase.run(now).await.unwrap();
        assert_eq!(first.expired, 2);
        assert!(first.expired_ids.contains(&overdue_a));
        assert!(first.expired_ids.contains(&overdue_b));
        assert!(!first.expired_ids.contains(&current));

        // Rerunning over the same data must find nothing.
        let second = usecase.run(now).await.unwrap();
        assert_eq!(second.expired, 0);
        assert!(second.expired_ids.is_empty());

        let subscriptions = repository.subscriptions.lock().unwrap();
        let still_active: Vec<Uuid> = subscriptions
            .iter()
            .filter(|s| s.active)
            .map(|s| s.id)
            .collect();
        assert_eq!(still_active, vec![current]);
    }

    #[tokio::test]
    async fn sweep_reports_zero_when_nothing_is_overdue() {
        let now = Utc::now();
        let repository = Arc::new(InMemoryExpiryRepository {
            subscriptions: Mutex::new(vec![FakeSubscription {
                id: Uuid::new_v4(),
                active: true,
                ends_at: now + Duration::days(30),
            }]),
        });

        let usecase = ExpireSubscriptionsUseCase::new(repository);
        let result = usecase.run(now).await.unwrap();

        assert_eq!(result.expired, 0);
        assert!(result.expired_ids.is_empty());
    }
}
