//! HTTP API over the recommend use case

use axum::{
    Json, Router,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use product_recs_domain::usecases::RecommendUseCase;
use product_recs_domain::{Product, RecommendationRequest, RecommendationResponse};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

/// Message shown to clients for every failure
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

#[derive(Clone)]
pub struct AppState {
    usecase: Arc<RecommendUseCase>,
}

impl AppState {
    pub fn new(usecase: Arc<RecommendUseCase>) -> Self {
        Self { usecase }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: String,
    message: &'static str,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn parts(self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        let envelope = ErrorEnvelope {
            error,
            message: GENERIC_ERROR_MESSAGE,
        };
        (status, Json(envelope)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub fn router(usecase: Arc<RecommendUseCase>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/products", get(list_products))
        .route("/api/recommendations", post(recommend))
        .with_state(AppState::new(usecase))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
}

pub async fn serve(
    bind_address: &str,
    port: u16,
    usecase: Arc<RecommendUseCase>,
) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        bind_address = %address,
        products = usecase.catalog().len(),
        generator = usecase.has_generator(),
        "Recommendation API listening"
    );

    axum::serve(listener, router(usecase)).await
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    products: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        products: state.usecase.catalog().len(),
    })
}

async fn list_products(State(state): State<AppState>) -> Json<Vec<Arc<Product>>> {
    Json(state.usecase.catalog().products().to_vec())
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected recommendation request");
        ApiError::from(rejection)
    })?;

    Ok(Json(state.usecase.recommend(&request).await))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(error = %detail, "Request handler panicked");

    ApiError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, header};
    use product_recs_domain::Catalog;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn product(id: &str, category: &str, brand: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: format!("Sturdy {id}, lightweight"),
            price,
            category: category.to_string(),
            brand: brand.to_string(),
            image: None,
            rating: Some(4.0),
        }
    }

    fn app() -> Router {
        let catalog = Catalog::new(vec![
            product("A", "Electronics", "Sony", 50.0),
            product("B", "Accessories", "Belkin", 30.0),
            product("C", "Sports", "Nike", 20.0),
            product("D", "Home", "Ikea", 45.0),
        ]);
        router(Arc::new(RecommendUseCase::deterministic(Arc::new(catalog))))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/recommendations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["products"], 4);
    }

    #[tokio::test]
    async fn test_list_products() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(4));
        assert_eq!(body[0]["id"], "A");
    }

    #[tokio::test]
    async fn test_recommendations() {
        let request = json!({
            "preferences": {"priceRange": "all", "categories": [], "brands": []},
            "likedProducts": [
                {"id": "A", "name": "Product A", "category": "Electronics", "brand": "Sony", "price": 50}
            ]
        });

        let response = app().oneshot(post_json(request.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let ids: Vec<_> = body["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["product"]["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["B", "D", "C"]);
        assert_eq!(
            body["recommendations"][0]["explanation"],
            "Since you liked Product A, you'll love Product B to complement it with sturdy b"
        );
    }

    #[tokio::test]
    async fn test_recommendations_with_empty_body_object() {
        let response = app().oneshot(post_json("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recommendations"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_envelope() {
        let response = app().oneshot(post_json("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], GENERIC_ERROR_MESSAGE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_panic_uses_envelope() {
        async fn boom() -> &'static str {
            panic!("kaboom")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "kaboom");
        assert_eq!(body["message"], GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
