use crate::config::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub razorpay: Razorpay,
    pub digio: Digio,
    pub frontend: Frontend,
    pub identity: Identity,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Razorpay {
    pub key_id: String,
    pub key_secret: String,
}

#[derive(Debug, Clone)]
pub struct Digio {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub template_name: String,
    pub webhook_secret: String,
}

#[derive(Debug, Clone)]
pub struct Frontend {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub jwt_secret: String,
}
