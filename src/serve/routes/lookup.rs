use axum::http::StatusCode;
use axum::{Json, extract::State, response::IntoResponse};

use crate::lookup::types::LookupQuery;
use crate::serve::AppState;
use crate::serve::error::ServeError;
use crate::serve::routes::parse_txid;
use crate::serve::types::{LookupRequest, TokenUtxo};

#[utoipa::path(
    tag = "Lookup",
    post,
    path = "/lookup",
    request_body = LookupRequest,
    responses(
        (status = 200, description = "Matching live token records", body = Vec<TokenUtxo>),
        (status = 400, description = "Missing query, insufficient query parameters or malformed request"),
        (status = 500, description = "Internal server error"),
    )
)]
/// Token Lookup
///
/// Answers a query against the live token index: either a single output selected
/// by `txid` and `vout`, or every live record via `find_all`.
pub async fn lookup(
    State(state): State<AppState>,
    Json(body): Json<LookupRequest>,
) -> Result<impl IntoResponse, ServeError> {
    let query = body
        .query
        .map(|params| -> Result<LookupQuery, ServeError> {
            let txid = params.txid.as_deref().map(parse_txid).transpose()?;

            Ok(LookupQuery {
                txid,
                vout: params.vout,
                find_all: params.find_all,
            })
        })
        .transpose()?;

    let records = state.lookup(query).await?;

    let data: Vec<TokenUtxo> = records.iter().map(TokenUtxo::from).collect();

    Ok((StatusCode::OK, Json(data)))
}
