pub mod digio_client;
pub mod error;
pub mod razorpay_client;
pub mod signature;
