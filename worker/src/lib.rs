pub mod config;
pub mod services;
pub mod usecases;
