use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{calculate_campaign_cost, meets_minimum, DesignOption, MINIMUM_PIECES};

/// Router builder exposing the stateless quote calculator.
pub fn quote_router() -> Router {
    Router::new().route("/api/v1/quote", get(quote_handler))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuoteQuery {
    #[serde(default)]
    pub(crate) quantity: Option<i64>,
    #[serde(default)]
    pub(crate) design_option: Option<String>,
}

pub(crate) async fn quote_handler(Query(query): Query<QuoteQuery>) -> Response {
    let Some(quantity) = query.quantity else {
        let payload = json!({ "error": "quantity is required" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    let design_option = match query.design_option.as_deref() {
        None | Some("") => DesignOption::default(),
        Some(raw) => match raw.parse::<DesignOption>() {
            Ok(option) => option,
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    let cost = calculate_campaign_cost(quantity, design_option);
    let payload = json!({
        "quantity": quantity.max(0),
        "designOption": design_option,
        "cost": cost,
        "display": cost.display(),
        "meetsMinimum": meets_minimum(quantity.max(0).unsigned_abs()),
        "minimumPieces": MINIMUM_PIECES,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&body).expect("valid json")
    }

    #[tokio::test]
    async fn quote_route_prices_template_order() {
        let response = quote_router()
            .oneshot(
                axum::http::Request::get("/api/v1/quote?quantity=2000&design_option=template")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["cost"]["total"], 3250.0);
        assert_eq!(payload["display"]["total"], "$3,250.00");
        assert_eq!(payload["display"]["total_rounded"], "$3,250");
        assert_eq!(payload["meetsMinimum"], true);
    }

    #[tokio::test]
    async fn quote_handler_rejects_unknown_design() {
        let query = QuoteQuery {
            quantity: Some(3000),
            design_option: Some("bespoke".to_string()),
        };
        let response = quote_handler(Query(query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn quote_handler_requires_quantity_and_clamps_negatives() {
        let response = quote_handler(Query(QuoteQuery::default())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let query = QuoteQuery {
            quantity: Some(-40),
            design_option: None,
        };
        let payload = read_json_body(quote_handler(Query(query)).await).await;
        assert_eq!(payload["quantity"], 0);
        assert_eq!(payload["cost"]["total"], 0.0);
        assert_eq!(payload["meetsMinimum"], false);
    }
}
