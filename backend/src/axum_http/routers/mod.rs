pub mod kyc;
pub mod payments;
