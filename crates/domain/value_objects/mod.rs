pub mod enums;
pub mod kyc;
pub mod payments;
pub mod subscriptions;
