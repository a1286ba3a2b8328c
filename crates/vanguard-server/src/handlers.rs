//! Statistics endpoint handlers.
//!
//! Every `/statistics/*` endpoint accepts the six optional filter parameters
//! (`min_playtime`, `max_playtime`, `min_light`, `max_light`, `min_triumph`,
//! `max_triumph`) and answers with the JSON form of the matching
//! [`QueryResponse`].

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query as QueryParams, State},
};
use serde_json::{Value, json};
use vanguard_analysis::{
    filter::FilterSpec,
    profile::Reference,
    query::{Query, QueryKind, QueryResponse},
};

use crate::{error::ApiError, state::AppState};

type Params = QueryParams<Vec<(String, String)>>;
type ApiResult = Result<Json<QueryResponse>, ApiError>;

/// Parses the filter and runs the query on the blocking thread pool.
async fn run_query(state: &AppState, kind: QueryKind, params: &[(String, String)]) -> ApiResult {
    let filter = FilterSpec::from_query_params(params.iter().map(|(k, v)| (k, v)))?;
    let engine = Arc::clone(&state.engine);
    let query = Query::new(kind, filter);
    let response = tokio::task::spawn_blocking(move || engine.run(&query)).await??;
    Ok(Json(response))
}

/// GET `/statistics/descriptive`
pub async fn descriptive(State(state): State<AppState>, QueryParams(params): Params) -> ApiResult {
    run_query(&state, QueryKind::Descriptive, &params).await
}

/// GET `/statistics/distribution`
pub async fn distribution(State(state): State<AppState>, QueryParams(params): Params) -> ApiResult {
    run_query(&state, QueryKind::Distribution, &params).await
}

/// GET `/statistics/class-comparison`
pub async fn class_comparison(
    State(state): State<AppState>,
    QueryParams(params): Params,
) -> ApiResult {
    run_query(&state, QueryKind::ClassComparison, &params).await
}

/// GET `/statistics/correlation`
pub async fn correlation(State(state): State<AppState>, QueryParams(params): Params) -> ApiResult {
    run_query(&state, QueryKind::Correlation, &params).await
}

/// GET `/statistics/hypothesis-tests`
pub async fn hypothesis_tests(
    State(state): State<AppState>,
    QueryParams(params): Params,
) -> ApiResult {
    run_query(&state, QueryKind::HypothesisTests, &params).await
}

/// GET `/statistics/filtered-count`
///
/// The percentile profile ranks the medians of the filtered subset against
/// the full population, and is `null` when no record passes the filter.
pub async fn filtered_count(
    State(state): State<AppState>,
    QueryParams(params): Params,
) -> ApiResult {
    run_query(&state, QueryKind::FilteredCount, &params).await
}

/// GET `/statistics/profile/{player_id}?reference=full|filtered`
///
/// `reference` defaults to `full`.
pub async fn profile(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    QueryParams(params): Params,
) -> ApiResult {
    let reference = params
        .iter()
        .rev()
        .find(|(key, _)| key == "reference")
        .map(|(_, value)| value.parse::<Reference>())
        .transpose()?
        .unwrap_or_default();
    let kind = QueryKind::Profile {
        player_id,
        reference,
    };
    run_query(&state, kind, &params).await
}

/// GET `/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
