use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use crates::{
    domain::{
        repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
        value_objects::payments::{CreateOrderModel, VerifyPaymentModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
    },
    vendors::razorpay_client::RazorpayClient,
};
use serde_json::json;

use crate::{
    axum_http::error_responses,
    config::config_model::DotEnvyConfig,
    usecases::payments::{PaymentUseCase, RazorpayGateway},
};

pub struct PaymentsState<S, P, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    G: RazorpayGateway + Send + Sync + 'static,
{
    pub usecase: PaymentUseCase<S, P, G>,
    pub debug_errors: bool,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let razorpay_client = RazorpayClient::new(
        config.razorpay.key_id.clone(),
        config.razorpay.key_secret.clone(),
    );

    let payments_usecase = PaymentUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(plan_repository),
        Arc::new(razorpay_client),
    );

    Router::new()
        .route("/create-order", post(create_order))
        .route("/verify", post(verify_payment))
        .with_state(Arc::new(PaymentsState {
            usecase: payments_usecase,
            debug_errors: config.stage.is_local(),
        }))
}

pub async fn create_order<S, P, G>(
    State(state): State<Arc<PaymentsState<S, P, G>>>,
    Json(create_order_model): Json<CreateOrderModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    G: RazorpayGateway + Send + Sync + 'static,
{
    match state.usecase.create_order(create_order_model).await {
        Ok(order) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": { "order": order },
            })),
        )
            .into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err, state.debug_errors),
    }
}

pub async fn verify_payment<S, P, G>(
    State(state): State<Arc<PaymentsState<S, P, G>>>,
    Json(verify_payment_model): Json<VerifyPaymentModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    G: RazorpayGateway + Send + Sync + 'static,
{
    match state.usecase.verify_payment(verify_payment_model).await {
        Ok(verified) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": {
                    "payment": verified.payment,
                    "subscriptionId": verified.subscription_id,
                },
            })),
        )
            .into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err, state.debug_errors),
    }
}
