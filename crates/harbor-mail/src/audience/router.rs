use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::aggregator::AudienceAggregator;
use super::coverage::{CoverageDataset, CoverageResponse};
use super::selection::{parse_list, AudienceSelection};

/// Coverage data shared by the public explorer endpoints.
#[derive(Debug)]
pub struct CoverageState {
    dataset: CoverageDataset,
    response: CoverageResponse,
}

impl CoverageState {
    pub fn new(dataset: CoverageDataset) -> Self {
        let response = dataset.response();
        Self { dataset, response }
    }

    pub fn dataset(&self) -> &CoverageDataset {
        &self.dataset
    }

    pub fn response(&self) -> &CoverageResponse {
        &self.response
    }
}

/// Router builder exposing the public coverage feed and audience totals.
pub fn audience_router(state: Arc<CoverageState>) -> Router {
    Router::new()
        .route("/api/public/coverage", get(coverage_handler))
        .route("/api/public/count", get(count_handler))
        .route("/api/v1/audience/total", post(total_handler))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CountQuery {
    #[serde(default)]
    pub(crate) cities: Option<String>,
    #[serde(default)]
    pub(crate) zips: Option<String>,
}

pub(crate) async fn coverage_handler(State(state): State<Arc<CoverageState>>) -> Response {
    (StatusCode::OK, Json(state.response().clone())).into_response()
}

pub(crate) async fn count_handler(
    State(state): State<Arc<CoverageState>>,
    Query(query): Query<CountQuery>,
) -> Response {
    let cities = query.cities.filter(|raw| !raw.is_empty());
    let zips = query.zips.filter(|raw| !raw.is_empty());

    match (cities, zips) {
        (Some(raw), _) => {
            let breakdown = state.dataset().count_by_cities(&parse_list(&raw));
            (StatusCode::OK, Json(breakdown)).into_response()
        }
        (None, Some(raw)) => {
            let breakdown = state.dataset().count_by_zips(&parse_list(&raw));
            (StatusCode::OK, Json(breakdown)).into_response()
        }
        (None, None) => {
            let payload = json!({ "error": "Provide cities or zips parameter" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn total_handler(
    State(state): State<Arc<CoverageState>>,
    Json(selection): Json<AudienceSelection>,
) -> Response {
    let summary = AudienceAggregator::new(state.response()).summarize(&selection);
    (StatusCode::OK, Json(summary)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audience::selection::SelectionMode;
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> Arc<CoverageState> {
        let csv = "county,city,zip_code,homeowner_count\n\
Palm Beach,Jupiter,33458,1850\n\
Palm Beach,Jupiter,33477,1250\n\
Palm Beach,Boca Raton,33432,2100\n";
        let dataset = CoverageDataset::from_reader(csv.as_bytes()).expect("coverage parses");
        Arc::new(CoverageState::new(dataset))
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&body).expect("valid json")
    }

    #[tokio::test]
    async fn count_requires_cities_or_zips() {
        let response = count_handler(State(state()), Query(CountQuery::default())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "Provide cities or zips parameter");
    }

    #[tokio::test]
    async fn count_prefers_cities_when_both_given() {
        let query = CountQuery {
            cities: Some("Jupiter".to_string()),
            zips: Some("33432".to_string()),
        };
        let response = count_handler(State(state()), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["total"], 3100);
        assert_eq!(payload["breakdown"]["Jupiter"], 3100);
    }

    #[tokio::test]
    async fn count_route_reads_zip_query() {
        let response = audience_router(state())
            .oneshot(
                axum::http::Request::get("/api/public/count?zips=33458,%2033432")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["total"], 3950);
        assert_eq!(payload["breakdown"]["33432"]["city"], "Boca Raton");
    }

    #[tokio::test]
    async fn coverage_route_serves_grouped_feed() {
        let response = audience_router(state())
            .oneshot(
                axum::http::Request::get("/api/public/coverage")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["counties"][0]["name"], "Palm Beach");
        assert_eq!(payload["counties"][0]["cities"][0]["name"], "Jupiter");
        assert_eq!(payload["zips"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn total_handler_reports_minimum_gate() {
        let mut selection = AudienceSelection::new("Palm Beach", SelectionMode::City);
        selection.toggle_city("Jupiter");
        selection.toggle_city("Boca Raton");

        let response = total_handler(State(state()), Json(selection)).await;
        let payload = read_json_body(response).await;
        assert_eq!(payload["total"], 5200);
        assert_eq!(payload["meets_minimum"], true);
        assert_eq!(payload["minimum_pieces"], 2000);
    }

    #[tokio::test]
    async fn total_route_accepts_documented_field_names() {
        let body = serde_json::json!({
            "mode": "city",
            "county": "Palm Beach",
            "cities": ["Jupiter"],
            "waterway": "all",
        });
        let response = audience_router(state())
            .oneshot(
                axum::http::Request::post("/api/v1/audience/total")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["total"], 3100);
        assert_eq!(payload["selected"], 1);
    }

    #[tokio::test]
    async fn total_route_rejects_unknown_fields() {
        let body = serde_json::json!({
            "county": "Palm Beach",
            "selectedCities": ["Jupiter"],
        });
        let response = audience_router(state())
            .oneshot(
                axum::http::Request::post("/api/v1/audience/total")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
