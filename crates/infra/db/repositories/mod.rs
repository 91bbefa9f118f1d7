pub mod plans;
pub mod subscription_expiry;
pub mod subscriptions;
