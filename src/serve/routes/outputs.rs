use axum::http::StatusCode;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use bitcoin::script::ScriptBuf;
use serde_json::json;

use crate::serve::AppState;
use crate::serve::error::ServeError;
use crate::serve::routes::parse_txid;
use crate::serve::types::{OutputAddedRequest, OutputSpentRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/added", post(output_added))
        .route("/spent", post(output_spent))
}

#[utoipa::path(
    tag = "Outputs",
    post,
    path = "/outputs/added",
    request_body = OutputAddedRequest,
    responses(
        (status = 200, description = "Output accepted (or ignored for an unsubscribed topic)"),
        (status = 400, description = "Malformed script, invalid token data or malformed request"),
        (status = 500, description = "Internal server error"),
    )
)]
/// Output Added
///
/// Notifies the service of a newly admitted output. Outputs on unsubscribed
/// topics are acknowledged without being indexed.
pub async fn output_added(
    State(state): State<AppState>,
    Json(body): Json<OutputAddedRequest>,
) -> Result<impl IntoResponse, ServeError> {
    let txid = parse_txid(&body.txid)?;

    let script_bytes = hex::decode(&body.output_script)
        .map_err(|_| ServeError::malformed_request("output_script is not valid hex"))?;
    let script = ScriptBuf::from_bytes(script_bytes);

    state
        .output_added(txid, body.vout, &script, &body.topic)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "status": "accepted" }))))
}

#[utoipa::path(
    tag = "Outputs",
    post,
    path = "/outputs/spent",
    request_body = OutputSpentRequest,
    responses(
        (status = 200, description = "Spend accepted (idempotent)"),
        (status = 400, description = "Malformed request"),
        (status = 500, description = "Internal server error"),
    )
)]
/// Output Spent
///
/// Notifies the service that an output has been spent. Replayed or unknown
/// spends are acknowledged without effect.
pub async fn output_spent(
    State(state): State<AppState>,
    Json(body): Json<OutputSpentRequest>,
) -> Result<impl IntoResponse, ServeError> {
    let txid = parse_txid(&body.txid)?;

    state.output_spent(txid, body.vout, &body.topic).await?;

    Ok((StatusCode::OK, Json(json!({ "status": "accepted" }))))
}
