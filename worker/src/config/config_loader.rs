use anyhow::{Ok, Result};

use super::config_model::{Database, DotEnvyConfig, Sweep};

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let sweep = Sweep {
        interval_secs: match std::env::var("SWEEP_INTERVAL_SECS") {
            std::result::Result::Ok(value) => value.parse()?,
            Err(_) => DEFAULT_SWEEP_INTERVAL_SECS,
        },
    };

    Ok(DotEnvyConfig { database, sweep })
}
