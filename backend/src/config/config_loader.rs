use anyhow::{Ok, Result};

use super::config_model::{
    BackendServer, Database, Digio, DotEnvyConfig, Frontend, Identity, Razorpay,
};
use crate::config::stage::Stage;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let razorpay = Razorpay {
        key_id: std::env::var("RAZORPAY_KEY_ID").expect("RAZORPAY_KEY_ID is invalid"),
        key_secret: std::env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET is invalid"),
    };

    let digio = Digio {
        base_url: std::env::var("DIGIO_BASE_URL")
            .unwrap_or_else(|_| "https://api.digio.in".to_string()),
        client_id: std::env::var("DIGIO_CLIENT_ID").expect("DIGIO_CLIENT_ID is invalid"),
        client_secret: std::env::var("DIGIO_CLIENT_SECRET").expect("DIGIO_CLIENT_SECRET is invalid"),
        template_name: std::env::var("DIGIO_TEMPLATE_NAME").expect("DIGIO_TEMPLATE_NAME is invalid"),
        webhook_secret: std::env::var("DIGIO_WEBHOOK_SECRET")
            .expect("DIGIO_WEBHOOK_SECRET is invalid"),
    };

    let frontend = Frontend {
        base_url: std::env::var("FRONTEND_BASE_URL").expect("FRONTEND_BASE_URL is invalid"),
    };

    let identity = Identity {
        jwt_secret: std::env::var("IDENTITY_JWT_SECRET").expect("IDENTITY_JWT_SECRET is invalid"),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        razorpay,
        digio,
        frontend,
        identity,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}
