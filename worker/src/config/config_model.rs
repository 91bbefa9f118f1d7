#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub database: Database,
    pub sweep: Sweep,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Sweep {
    pub interval_secs: u64,
}
