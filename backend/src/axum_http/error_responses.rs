use std::fmt::{Debug, Display};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    // Debug-format chain, local stage only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Turns a usecase error into the JSON error envelope. Every error's Display
/// is written to be safe for clients; `include_detail` additionally attaches
/// the Debug chain and is only enabled in the local stage.
pub fn respond<E>(status: StatusCode, err: &E, include_detail: bool) -> Response
where
    E: Display + Debug,
{
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message: err.to_string(),
        detail: include_detail.then(|| format!("{err:?}")),
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_omitted_from_serialized_body_when_absent() {
        let body = serde_json::to_value(ErrorResponse {
            code: 404,
            message: "plan not found".to_string(),
            detail: None,
        })
        .unwrap();

        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "plan not found");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn detail_carries_debug_chain_when_enabled() {
        let err = anyhow::anyhow!("connection reset").context("failed to load plan");
        let response = respond(StatusCode::INTERNAL_SERVER_ERROR, &err, true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
