pub mod kyc_statuses;
pub mod subscription_statuses;
