// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Axum handlers. Each one is a thin adapter over the library calls so the
//! tests can drive them directly.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::market::{self, MarketSnapshot};
use crate::prediction::{self, PricePrediction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn reply(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
        (status, Json(ErrorResponse { error: message.into() }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Market figures, or an empty object for an unknown neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarketResponse {
    Known(MarketSnapshot),
    Unknown {},
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PricePrediction>, (StatusCode, Json<ErrorResponse>)> {
    let body = match payload {
        Ok(Json(Value::Object(body))) => body,
        Ok(_) | Err(_) => {
            return Err(ErrorResponse::reply(StatusCode::BAD_REQUEST, "Invalid JSON body"));
        }
    };

    match prediction::predict(&state.session, &body) {
        Ok(prediction) => Ok(Json(prediction)),
        Err(e) if e.is_validation() => Err(ErrorResponse::reply(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!("Prediction error: {}", e);
            Err(ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
        }
    }
}

pub async fn market(Path(neighborhood): Path<String>) -> Json<MarketResponse> {
    match market::lookup(&neighborhood) {
        Some(snapshot) => Json(MarketResponse::Known(snapshot)),
        None => Json(MarketResponse::Unknown {}),
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "ReaValue API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    ErrorResponse::reply(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::router;
    use crate::session::tests::trained_session;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(trained_session().clone())
    }

    fn request() -> Value {
        json!({
            "neighborhood": "Suburb",
            "year_built": 1998,
            "sqft": 2100,
            "bedrooms": 3,
            "bathrooms": 2.0,
            "overall_quality": 6,
            "garage_area": 400,
            "has_pool": false,
            "has_basement": true,
            "condition": "Good"
        })
    }

    #[tokio::test]
    async fn test_predict() {
        let result = predict(State(test_state()), Ok(Json(request()))).await;
        let Json(prediction) = result.unwrap();
        assert!(prediction.predicted_price > 0.0);
        assert_eq!(prediction.confidence, 0.92);
        assert_eq!(prediction.feature_importance.len(), 5);
    }

    #[tokio::test]
    async fn test_predict_missing_field() {
        let mut body = request();
        body.as_object_mut().unwrap().remove("garage_area");

        let (status, Json(err)) = predict(State(test_state()), Ok(Json(body))).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Missing field: garage_area");
    }

    #[tokio::test]
    async fn test_predict_malformed_value() {
        let mut body = request();
        body["bedrooms"] = json!([3]);

        let (status, Json(err)) = predict(State(test_state()), Ok(Json(body))).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error, "Internal server error");
    }

    #[tokio::test]
    async fn test_predict_non_object_body() {
        let (status, Json(err)) =
            predict(State(test_state()), Ok(Json(json!([1, 2, 3])))).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_market_known() {
        let Json(response) = market(Path("Rural".to_string())).await;
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"avg_price": 180000, "trend": "-0.5%", "days_on_market": 30})
        );
    }

    #[tokio::test]
    async fn test_market_unknown() {
        let Json(response) = market(Path("Unknown".to_string())).await;
        assert_eq!(response, MarketResponse::Unknown {});
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "ReaValue API");
        assert_eq!(body.version, "1.0.0");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, Json(body)) = not_found().await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not found");
    }

    fn test_app() -> (Router, TempDir) {
        let frontend = tempfile::tempdir().unwrap();
        std::fs::write(frontend.path().join("index.html"), "<h1>RealValue</h1>").unwrap();
        let config = Config::default().with_frontend_dir(frontend.path().to_path_buf());
        (router(test_state(), &config), frontend)
    }

    async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn as_json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_router_market_under_both_prefixes() {
        let expected = json!({"avg_price": 180000, "trend": "-0.5%", "days_on_market": 30});
        for uri in ["/api/v1/market/Rural", "/market/Rural"] {
            let (app, _frontend) = test_app();
            let (status, body) = send(app, Method::GET, uri, "").await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(as_json(&body), expected, "{}", uri);
        }

        let (app, _frontend) = test_app();
        let (status, body) = send(app, Method::GET, "/api/v1/market/Atlantis", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({}));
    }

    #[tokio::test]
    async fn test_router_health() {
        let (app, _frontend) = test_app();
        let (status, body) = send(app, Method::GET, "/api/v1/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body)["status"], "healthy");
    }

    #[tokio::test]
    async fn test_router_predict() {
        let (app, _frontend) = test_app();
        let (status, body) = send(app, Method::POST, "/api/v1/predict", &request().to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body)["confidence"], 0.92);
    }

    #[tokio::test]
    async fn test_router_predict_rejects_unparseable_body() {
        let (app, _frontend) = test_app();
        let (status, body) = send(app, Method::POST, "/predict", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body), json!({"error": "Invalid JSON body"}));
    }

    #[tokio::test]
    async fn test_router_predict_missing_field() {
        let mut request = request();
        request.as_object_mut().unwrap().remove("condition");

        let (app, _frontend) = test_app();
        let (status, body) = send(app, Method::POST, "/predict", &request.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body), json!({"error": "Missing field: condition"}));
    }

    #[tokio::test]
    async fn test_router_unknown_paths_return_json_404() {
        for method in [Method::GET, Method::POST] {
            let (app, _frontend) = test_app();
            let (status, body) = send(app, method.clone(), "/nope", "").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", method);
            assert_eq!(as_json(&body), json!({"error": "Not found"}), "{}", method);
        }
    }

    #[tokio::test]
    async fn test_router_serves_frontend_index() {
        let (app, _frontend) = test_app();
        let (status, body) = send(app, Method::GET, "/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>RealValue</h1>");
    }
}
