//! HTTP API tests.
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot` against a
//! seeded sample population.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt as _;
use serde_json::Value;
use tower::ServiceExt as _;
use vanguard_analysis::{
    dataset::{DatasetAccessor, DatasetError, SampleSource},
    query::{EngineConfig, StatisticsEngine},
    record::Population,
    sample::SampleConfig,
};
use vanguard_server::{AppState, router};

/// First player id of a generated sample.
const FIRST_SAMPLE_PLAYER: &str = "4611686018400000000";

struct UnavailableSource;

impl DatasetAccessor for UnavailableSource {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn snapshot(&self) -> Result<Arc<Population>, DatasetError> {
        Err(DatasetError::Poisoned)
    }
}

fn app_with(source: Arc<dyn DatasetAccessor>) -> Router {
    let engine = StatisticsEngine::new(source, EngineConfig::default()).unwrap();
    router(AppState::new(engine))
}

fn sample_app() -> Router {
    app_with(Arc::new(SampleSource::generate(SampleConfig::default())))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(sample_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_descriptive() {
    let (status, body) = get(sample_app(), "/statistics/descriptive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_players"], 500);
    assert_eq!(body["metadata"]["filtered_count"], 500);
    for field in ["light_level", "triumph_score", "play_time_hours"] {
        let stats = &body[field];
        assert_eq!(stats["count"], 500);
        let q1 = stats["q1"].as_f64().unwrap();
        let median = stats["median"].as_f64().unwrap();
        let q3 = stats["q3"].as_f64().unwrap();
        assert!(stats["min"].as_f64().unwrap() <= q1);
        assert!(q1 <= median && median <= q3);
        assert!(q3 <= stats["max"].as_f64().unwrap());
    }
}

#[tokio::test]
async fn test_filter_parameters_narrow_results() {
    let (_, all) = get(sample_app(), "/statistics/filtered-count").await;
    let (_, some) = get(sample_app(), "/statistics/filtered-count?min_light=1795").await;
    let (_, fewer) = get(
        sample_app(),
        "/statistics/filtered-count?min_light=1795&max_triumph=200000",
    )
    .await;
    let all = all["filtered_count"].as_u64().unwrap();
    let some = some["filtered_count"].as_u64().unwrap();
    let fewer = fewer["filtered_count"].as_u64().unwrap();
    assert_eq!(all, 500);
    assert!(some <= all);
    assert!(fewer <= some);
}

#[tokio::test]
async fn test_filtered_count_above_every_value() {
    let (status, body) = get(sample_app(), "/statistics/filtered-count?min_light=99999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filtered_count"], 0);
    assert_eq!(body["total_players"], 500);
    assert!(body["percentiles"].is_null());
}

#[tokio::test]
async fn test_filtered_count_percentiles_are_in_range() {
    let (status, body) = get(sample_app(), "/statistics/filtered-count?min_playtime=100").await;
    assert_eq!(status, StatusCode::OK);
    let percentiles = body["percentiles"].as_object().unwrap();
    assert_eq!(percentiles.len(), 5);
    for key in ["light_level", "triumph", "play_time", "characters", "versatility"] {
        let value = percentiles[key].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&value), "{key} = {value}");
    }
}

#[tokio::test]
async fn test_distribution_sums_to_filtered_count() {
    let (status, body) = get(sample_app(), "/statistics/distribution?max_light=1800").await;
    assert_eq!(status, StatusCode::OK);
    let total = body["light_level_distribution"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum::<u64>();
    assert_eq!(Some(total), body["metadata"]["filtered_count"].as_u64());
    assert_eq!(body["bucket_width"], 10.0);
}

#[tokio::test]
async fn test_class_comparison_shape() {
    let (status, body) = get(sample_app(), "/statistics/class-comparison").await;
    assert_eq!(status, StatusCode::OK);
    for class in ["titan", "hunter", "warlock"] {
        let count = body[class]["count"].as_u64().unwrap();
        let values = body["visualization_data"]["data"][class].as_array().unwrap();
        assert_eq!(values.len() as u64, count);
    }
}

#[tokio::test]
async fn test_correlation_shape() {
    let (status, body) = get(sample_app(), "/statistics/correlation").await;
    assert_eq!(status, StatusCode::OK);
    let analysis = &body["correlation_analysis"];
    assert_eq!(analysis["status"], "completed");
    assert_eq!(analysis["scatter_data"]["x"].as_array().unwrap().len(), 200);
    assert_eq!(analysis["scatter_data"]["y"].as_array().unwrap().len(), 200);
    assert_eq!(analysis["regression"]["status"], "fitted");
    assert!(analysis["regression"]["std_error"].as_f64().unwrap() > 0.0);
    let r = analysis["r"].as_f64().unwrap();
    assert!((-1.0..=1.0).contains(&r));
    assert!(analysis["strength"].is_string());
}

#[tokio::test]
async fn test_hypothesis_tests_shape() {
    let (status, body) = get(sample_app(), "/statistics/hypothesis-tests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["degrees_of_freedom"]["between"], 2);
    assert_eq!(body["degrees_of_freedom"]["within"], 497);
    assert!(body["p_value"].is_number());
    assert!(body["conclusion"].is_string());
    for group in body["groups"].as_array().unwrap() {
        assert!(group["min"].as_f64().unwrap() <= group["max"].as_f64().unwrap());
    }
}

#[tokio::test]
async fn test_inverted_bounds_are_client_errors() {
    let (status, body) = get(
        sample_app(),
        "/statistics/descriptive?min_light=1900&max_light=1800",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_filter");
    assert_eq!(body["error"]["field"], "light_level");
}

#[tokio::test]
async fn test_non_numeric_parameter_is_client_error() {
    let (status, body) = get(sample_app(), "/statistics/filtered-count?min_triumph=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_filter");
    assert_eq!(body["error"]["field"], "min_triumph");
}

#[tokio::test]
async fn test_profile() {
    let uri = format!("/statistics/profile/{FIRST_SAMPLE_PLAYER}");
    let (status, body) = get(sample_app(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player_id"], FIRST_SAMPLE_PLAYER);
    assert_eq!(body["reference"], "full");
    assert!(body["percentiles"]["light_level"].is_number());

    let uri = format!("/statistics/profile/{FIRST_SAMPLE_PLAYER}?reference=filtered&min_light=99999");
    let (status, body) = get(sample_app(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reference"], "filtered");
    assert!(body["percentiles"].is_null());
}

#[tokio::test]
async fn test_profile_errors() {
    let (status, body) = get(sample_app(), "/statistics/profile/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "player_not_found");

    let uri = format!("/statistics/profile/{FIRST_SAMPLE_PLAYER}?reference=everyone");
    let (status, body) = get(sample_app(), &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_reference");
}

#[tokio::test]
async fn test_unavailable_data() {
    let app = app_with(Arc::new(UnavailableSource));
    let (status, body) = get(app, "/statistics/descriptive").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "data_unavailable");
}

#[tokio::test]
async fn test_filter_errors_take_precedence_over_unavailable_data() {
    let app = app_with(Arc::new(UnavailableSource));
    let (status, body) = get(app, "/statistics/descriptive?min_light=5&max_light=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_filter");
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(sample_app(), "/statistics/median-of-medians").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
