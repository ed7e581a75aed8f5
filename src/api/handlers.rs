//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{CalculateQuery, ErrorResponse};
use crate::estimate::{CalculationInput, EngineConstants};

/// Sizes and prices the posted input.
///
/// `POST /calculate` → 200 + `CalculationResult` JSON (lenient)
/// `POST /calculate?mode=strict` → 200, or 422 + `ErrorResponse` on invalid input
pub async fn post_calculate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalculateQuery>,
    Json(input): Json<CalculationInput>,
) -> impl IntoResponse {
    match state.calculator.calculate(&input, query.mode) {
        Ok(result) => Ok(Json(result)),
        Err(failure) => {
            tracing::info!(%failure, "rejected strict calculation");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::from(failure)),
            ))
        }
    }
}

/// Returns the coefficients this server calculates with.
///
/// `GET /constants` → 200 + `EngineConstants` JSON
pub async fn get_constants(State(state): State<Arc<AppState>>) -> Json<EngineConstants> {
    Json(*state.calculator.constants())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::estimate::{Calculator, LineItem, PanelSpec};

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            calculator: Calculator::default(),
        })
    }

    fn make_input() -> CalculationInput {
        CalculationInput {
            unit_energy_cost: 0.95,
            local_irradiation: 5.0,
            panel: PanelSpec {
                capacity_watts: 550.0,
                price: 900.0,
            },
            monthly_consumption_kwh: vec![300.0; 13],
            average_increase_kwh: 0.0,
            roof_orientation_factor: 1.0,
            discount: 0.0,
            increase: 0.0,
            discount_is_percent: false,
            line_items: vec![
                LineItem::new(1, "Panel", 0.0, 900.0),
                LineItem::new(2, "Inverter", 1.0, 4000.0),
            ],
            apply_calculation: true,
        }
    }

    fn post(uri: &str, input: &CalculationInput) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(input).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn calculate_returns_200() {
        let app = router(make_test_state());
        let resp = app.oneshot(post("/calculate", &make_input())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["result_panels_amount"], 5);
        assert_eq!(json["estimate_items"][0]["quantity"], 5.0);
    }

    #[tokio::test]
    async fn strict_invalid_input_returns_422() {
        let app = router(make_test_state());
        let mut input = make_input();
        input.local_irradiation = 0.0;
        let resp = app
            .oneshot(post("/calculate?mode=strict", &input))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
        assert_eq!(json["violations"][0]["kind"], "non_positive_irradiation");
    }

    #[tokio::test]
    async fn lenient_invalid_input_returns_degraded_result() {
        let app = router(make_test_state());
        let mut input = make_input();
        input.local_irradiation = 0.0;
        let resp = app
            .oneshot(post("/calculate?mode=lenient", &input))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["final_system_capacity_kwp"], 0.0);
        assert_eq!(json["issues"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn constants_returns_defaults() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/constants")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["days_in_reference_month"], 30.0);
        assert_eq!(json["performance_ratio"], 0.8);
    }
}
