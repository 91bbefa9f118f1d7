use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use crates::{
    domain::{
        repositories::subscriptions::SubscriptionRepository, value_objects::kyc::KycInitModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::subscriptions::SubscriptionPostgres,
    },
    vendors::digio_client::DigioClient,
};
use serde_json::json;
use tracing::info;

use crate::{
    auth::Authenticator,
    axum_http::error_responses,
    config::config_model::DotEnvyConfig,
    usecases::kyc::{DIGIO_SIGNATURE_HEADER, DigioGateway, KycUseCase},
};

pub struct KycState<S, D>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DigioGateway + Send + Sync + 'static,
{
    pub usecase: KycUseCase<S, D>,
    pub authenticator: Authenticator,
    pub debug_errors: bool,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let digio_client = DigioClient::new(
        config.digio.base_url.clone(),
        config.digio.client_id.clone(),
        config.digio.client_secret.clone(),
        config.digio.webhook_secret.clone(),
    );

    let kyc_usecase = KycUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(digio_client),
        config.digio.template_name.clone(),
        config.frontend.base_url.clone(),
    );

    Router::new()
        .route("/init", post(init_kyc))
        .route("/webhook", post(kyc_webhook))
        .with_state(Arc::new(KycState {
            usecase: kyc_usecase,
            authenticator: Authenticator::from_config(
                config.stage,
                config.identity.jwt_secret.clone(),
            ),
            debug_errors: config.stage.is_local(),
        }))
}

pub async fn init_kyc<S, D>(
    State(state): State<Arc<KycState<S, D>>>,
    headers: HeaderMap,
    Json(kyc_init_model): Json<KycInitModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DigioGateway + Send + Sync + 'static,
{
    let user = match state.authenticator.authenticate(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    info!(user_id = %user.user_id, "kyc: initiation requested");

    match state.usecase.initiate(kyc_init_model).await {
        Ok(initiated) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "kycUrl": initiated.kyc_url,
                    "referenceId": initiated.reference_id,
                },
            })),
        )
            .into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err, state.debug_errors),
    }
}

/// Vendor-facing endpoint. Authenticated by the HMAC header over the raw
/// body, never by a bearer token, so the body is taken as bytes before any
/// JSON parsing happens.
pub async fn kyc_webhook<S, D>(
    State(state): State<Arc<KycState<S, D>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DigioGateway + Send + Sync + 'static,
{
    let signature_header = headers
        .get(DIGIO_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.usecase.handle_webhook(&body, signature_header).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err, state.debug_errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::stage::Stage;
    use crate::usecases::kyc::MockDigioGateway;
    use crates::domain::repositories::subscriptions::MockSubscriptionRepository;

    fn empty_init_model() -> KycInitModel {
        KycInitModel {
            customer_identifier: None,
            customer_name: None,
            reference_id: None,
            notify_customer: None,
            generate_access_token: None,
            request_details: None,
        }
    }

    fn state_with(
        authenticator: Authenticator,
    ) -> Arc<KycState<MockSubscriptionRepository, MockDigioGateway>> {
        let usecase = KycUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockDigioGateway::new()),
            "ADVISORY_KYC".to_string(),
            "https://app.example.com".to_string(),
        );

        Arc::new(KycState {
            usecase,
            authenticator,
            debug_errors: false,
        })
    }

    #[tokio::test]
    async fn init_rejects_unauthenticated_request_before_validation() {
        let state = state_with(Authenticator::from_config(
            Stage::Production,
            "supersecretjwtsecretforunittesting123".to_string(),
        ));

        let response = init_kyc(State(state), HeaderMap::new(), Json(empty_init_model()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn init_binds_the_fixture_user_and_reaches_the_usecase() {
        let state = state_with(Authenticator::from_config(
            Stage::Local,
            "supersecretjwtsecretforunittesting123".to_string(),
        ));

        // Fixture auth succeeds without headers; the empty body then fails
        // field validation inside the usecase.
        let response = init_kyc(State(state), HeaderMap::new(), Json(empty_init_model()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_without_signature_header_is_unauthorized() {
        let state = state_with(Authenticator::from_config(
            Stage::Production,
            "supersecretjwtsecretforunittesting123".to_string(),
        ));

        let response = kyc_webhook(
            State(state),
            HeaderMap::new(),
            Bytes::from_static(br#"{"reference_id":"KID_123","status":"verified"}"#),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
